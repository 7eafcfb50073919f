//! OpenAPI 2.0 (Swagger) generator
//!
//! Serializes the [`ApiModel`](crate::ApiModel) IR into the OpenAPI 2.0
//! documents that the host's OpenAPI widget renders.
//!
//! ## Mapping
//! - `baseUri` → `host`, `basePath`, `schemes`
//! - default media types → `consumes` / `produces`
//! - URI, query and header parameters → `path`, `query`, `header` parameters
//! - JSON bodies → a `body` parameter; form bodies → `formData` parameters
//! - named types → `definitions`, referenced as `#/definitions/<name>`
//!
//! ## Usage
//! ```rust,ignore
//! use raml_api_docs_parser::oas20::Oas20Writer;
//! use raml_api_docs_parser::Oas20Generator;
//!
//! let json = Oas20Writer::new().generate_string(&model)?;
//! ```

mod converter;
mod generator;
mod types;

pub use converter::shape_to_schema;
pub use generator::Oas20Writer;
pub use types::*;
