//! RAML 0.8 / 1.0 modeler
//!
//! Reads RAML definitions into the [`ApiModel`](crate::ApiModel) IR.
//!
//! ## Coverage
//! This is a structural modeler for the subset of RAML that documentation
//! rendering needs:
//! - Root metadata: `title`, `version`, `description`, `baseUri`,
//!   `protocols`, `mediaType`
//! - Named types: 0.8 `schemas`, 1.0 `types` / `schemas`
//! - Nested resources with `uriParameters` and the standard HTTP methods
//! - Method `queryParameters`, `headers`, `body` and `responses`
//!
//! Traits, resource types, security schemes and `!include` are not resolved.
//!
//! ## Usage
//! ```rust,ignore
//! use raml_api_docs_parser::raml::RamlModeler;
//!
//! let model = RamlModeler::raml10().model("#%RAML 1.0\ntitle: Users")?;
//! assert_eq!(model.title, "Users");
//! ```

mod converter;
mod parser;
mod types;

pub use parser::RamlModeler;
