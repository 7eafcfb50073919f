//! RAML to OpenAPI 2.0 conversion
//!
//! This crate converts RAML 0.8 and 1.0 definitions into OpenAPI 2.0
//! documents for rendering by an OpenAPI-capable documentation widget.
//!
//! ## Conversion Pipeline
//!
//! - [`RamlToOpenApi`] detects the version from the `#%RAML` header and
//!   tracks loading/error/result state for the latest requested definition
//! - [`RamlParser`] memoizes results per (version, definition) and
//!   dispatches to the strategy registered for the version
//! - [`ModelingStrategy`] models the definition into an [`ApiModel`]
//!   ([`raml::RamlModeler`]) and serializes it ([`oas20::Oas20Writer`])
//!
//! ## Usage
//! ```rust,ignore
//! use raml_api_docs_parser::RamlParser;
//!
//! let parser = RamlParser::new();
//! let openapi = parser.parse_version("#%RAML 1.0\ntitle: Users", "1.0").await?;
//! ```

mod adapter;
mod dispatcher;
mod model;
mod modeling;
pub mod oas20;
pub mod raml;
mod strategy;

pub use adapter::RamlToOpenApi;
pub use dispatcher::{CacheStats, RamlParser, RamlParserBuilder};
pub use model::{
    ApiModel, Endpoint, HttpMethod, ObjectShape, Operation, Parameter, Payload, Property,
    Response, ScalarKind, ScalarShape, Shape,
};
pub use modeling::{ApiModeler, Oas20Generator};
pub use strategy::{ConversionStrategy, ModelingStrategy};

pub use raml_api_docs_common::{
    ConversionError, HookResponse, ModelingError, OutputFormat, ParserConfig, RamlVersion, Result,
};
