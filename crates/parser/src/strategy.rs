//! Per-version conversion strategies

use crate::modeling::{ApiModeler, Oas20Generator};
use crate::oas20::Oas20Writer;
use crate::raml::RamlModeler;
use async_trait::async_trait;
use raml_api_docs_common::{RamlVersion, Result};
use std::sync::Arc;

/// Converts a definition of one RAML version to an OpenAPI 2.0 string
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversionStrategy: Send + Sync {
    async fn parse(&self, definition: &str) -> Result<String>;
}

/// Strategy that models the definition, then generates OpenAPI 2.0 from the model
///
/// Errors from either step are returned unchanged.
pub struct ModelingStrategy {
    version: RamlVersion,
    modeler: Arc<dyn ApiModeler>,
    generator: Arc<dyn Oas20Generator>,
}

impl ModelingStrategy {
    pub fn new(
        version: RamlVersion,
        modeler: Arc<dyn ApiModeler>,
        generator: Arc<dyn Oas20Generator>,
    ) -> Self {
        Self {
            version,
            modeler,
            generator,
        }
    }

    /// Built-in strategy for the given version
    pub fn for_version(version: RamlVersion) -> Self {
        Self::new(
            version,
            Arc::new(RamlModeler::new(version)),
            Arc::new(Oas20Writer::new()),
        )
    }

    /// Built-in strategy for RAML 0.8
    pub fn raml08() -> Self {
        Self::for_version(RamlVersion::V08)
    }

    /// Built-in strategy for RAML 1.0
    pub fn raml10() -> Self {
        Self::for_version(RamlVersion::V10)
    }

    pub fn version(&self) -> RamlVersion {
        self.version
    }
}

#[async_trait]
impl ConversionStrategy for ModelingStrategy {
    async fn parse(&self, definition: &str) -> Result<String> {
        tracing::debug!("Modeling RAML {} definition", self.version);
        let model = self.modeler.parse(definition).await?;
        Ok(self.generator.generate_string(&model)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ApiModel;
    use crate::modeling::{MockApiModeler, MockOas20Generator};
    use raml_api_docs_common::{ConversionError, ModelingError};

    #[tokio::test]
    async fn test_models_then_generates() {
        let definition = "#%RAML 0.8\ntitle: Test API";
        let mock_output = r#"{"openapi": "3.0.0"}"#;

        let mut modeler = MockApiModeler::new();
        modeler
            .expect_parse()
            .withf(move |d: &str| d == definition)
            .times(1)
            .returning(|_| Ok(ApiModel::new(RamlVersion::V08, "Mocked")));

        let mut generator = MockOas20Generator::new();
        generator
            .expect_generate_string()
            .withf(|model: &ApiModel| model.title == "Mocked")
            .times(1)
            .returning(move |_| Ok(mock_output.to_string()));

        let strategy =
            ModelingStrategy::new(RamlVersion::V08, Arc::new(modeler), Arc::new(generator));

        assert_eq!(strategy.parse(definition).await.unwrap(), mock_output);
    }

    #[tokio::test]
    async fn test_modeling_failure_skips_generation() {
        let mut modeler = MockApiModeler::new();
        modeler
            .expect_parse()
            .returning(|_| Err(ModelingError::External("Parse error".to_string())));

        let mut generator = MockOas20Generator::new();
        generator.expect_generate_string().never();

        let strategy =
            ModelingStrategy::new(RamlVersion::V10, Arc::new(modeler), Arc::new(generator));

        let err = strategy.parse("#%RAML 1.0\n").await.unwrap_err();
        assert!(matches!(
            err,
            ConversionError::Modeling(ModelingError::External(ref msg)) if msg == "Parse error"
        ));
        assert_eq!(err.to_string(), "Parse error");
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let mut modeler = MockApiModeler::new();
        modeler
            .expect_parse()
            .returning(|_| Ok(ApiModel::new(RamlVersion::V10, "T")));

        let mut generator = MockOas20Generator::new();
        generator
            .expect_generate_string()
            .returning(|_| Err(ModelingError::Generation("boom".to_string())));

        let strategy =
            ModelingStrategy::new(RamlVersion::V10, Arc::new(modeler), Arc::new(generator));

        let err = strategy.parse("#%RAML 1.0\ntitle: T").await.unwrap_err();
        assert_eq!(err.to_string(), "Generation error: boom");
    }

    #[tokio::test]
    async fn test_builtin_strategy_end_to_end() {
        let output = ModelingStrategy::raml10()
            .parse("#%RAML 1.0\ntitle: Test API\n/ping:\n  get:\n")
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["swagger"], "2.0");
        assert!(value["paths"]["/ping"]["get"].is_object());
    }
}
