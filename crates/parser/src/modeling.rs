//! Seams to the API modeling layer
//!
//! A modeler turns definition text of one RAML version into an [`ApiModel`];
//! a generator serializes that model to OpenAPI 2.0 text. The built-in
//! implementations live in [`crate::raml`] and [`crate::oas20`].

use crate::model::ApiModel;
use async_trait::async_trait;
use raml_api_docs_common::ModelingError;

/// Parses definition text of a single RAML version into an API model
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiModeler: Send + Sync {
    async fn parse(&self, definition: &str) -> Result<ApiModel, ModelingError>;
}

/// Serializes an API model to an OpenAPI 2.0 document
#[cfg_attr(test, mockall::automock)]
pub trait Oas20Generator: Send + Sync {
    fn generate_string(&self, model: &ApiModel) -> Result<String, ModelingError>;
}
