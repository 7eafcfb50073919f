//! RAML definition loader

use super::converter::convert_raml_to_model;
use crate::model::ApiModel;
use crate::modeling::ApiModeler;
use async_trait::async_trait;
use raml_api_docs_common::{ModelingError, RamlVersion};

/// RAML modeler bound to one grammar version
///
/// Checks the `#%RAML <version>` header, loads the YAML body and converts
/// it to an [`ApiModel`].
#[derive(Debug, Clone, Copy)]
pub struct RamlModeler {
    version: RamlVersion,
}

impl RamlModeler {
    pub fn new(version: RamlVersion) -> Self {
        Self { version }
    }

    /// Modeler for RAML 0.8 definitions
    pub fn raml08() -> Self {
        Self::new(RamlVersion::V08)
    }

    /// Modeler for RAML 1.0 definitions
    pub fn raml10() -> Self {
        Self::new(RamlVersion::V10)
    }

    pub fn version(&self) -> RamlVersion {
        self.version
    }

    /// Model a definition synchronously
    pub fn model(&self, definition: &str) -> Result<ApiModel, ModelingError> {
        model_definition(definition, self.version)
    }
}

#[async_trait]
impl ApiModeler for RamlModeler {
    async fn parse(&self, definition: &str) -> Result<ApiModel, ModelingError> {
        let version = self.version;
        let text = definition.to_owned();

        tokio::task::spawn_blocking(move || model_definition(&text, version))
            .await
            .map_err(|e| ModelingError::External(format!("RAML modeling task failed: {}", e)))?
    }
}

fn model_definition(definition: &str, version: RamlVersion) -> Result<ApiModel, ModelingError> {
    check_header(definition, version)?;

    let doc: serde_yaml::Value = serde_yaml::from_str(definition)
        .map_err(|e| ModelingError::Parse(format!("Failed to parse RAML YAML: {}", e)))?;

    convert_raml_to_model(&doc, version)
}

/// Verify the first line carries the header of the expected version
fn check_header(definition: &str, version: RamlVersion) -> Result<(), ModelingError> {
    let first_line = definition
        .trim_start_matches('\u{feff}')
        .lines()
        .next()
        .unwrap_or("")
        .trim_end();

    let expected = version.header();
    match first_line.strip_prefix(expected) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => Ok(()),
        _ if first_line.starts_with("#%RAML") => Err(ModelingError::Parse(format!(
            "expected '{}' header, found '{}'",
            expected, first_line
        ))),
        _ => Err(ModelingError::Parse(format!(
            "missing '{}' header",
            expected
        ))),
    }
}
