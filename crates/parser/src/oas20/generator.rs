//! OpenAPI 2.0 document writer

use super::converter::convert_model_to_swagger;
use super::types::SwaggerSpec;
use crate::model::ApiModel;
use crate::modeling::Oas20Generator;
use raml_api_docs_common::ModelingError;

/// Writes an [`ApiModel`] as a pretty-printed OpenAPI 2.0 JSON document
#[derive(Debug, Clone, Copy, Default)]
pub struct Oas20Writer;

impl Oas20Writer {
    pub fn new() -> Self {
        Self
    }

    /// Build the Swagger document without serializing it
    pub fn document(&self, model: &ApiModel) -> SwaggerSpec {
        convert_model_to_swagger(model)
    }
}

impl Oas20Generator for Oas20Writer {
    fn generate_string(&self, model: &ApiModel) -> Result<String, ModelingError> {
        serde_json::to_string_pretty(&self.document(model))
            .map_err(|e| ModelingError::Generation(format!("Failed to serialize OpenAPI 2.0: {}", e)))
    }
}
