//! Widget registry augmentation

use crate::raml_widget::create_raml_widget;
use crate::widget::{by_type, ApiDefinitionWidget, Renderable};
use raml_api_docs_common::{PluginConfig, WidgetSettings};
use raml_api_docs_parser::RamlParser;
use std::sync::Arc;

/// Adds a RAML widget to widget lists that contain an OpenAPI widget
pub struct WidgetAugmenter {
    parser: Arc<RamlParser>,
    settings: WidgetSettings,
}

impl WidgetAugmenter {
    pub fn new(parser: Arc<RamlParser>, settings: WidgetSettings) -> Self {
        Self { parser, settings }
    }

    /// Augmenter with its own parser configured from plugin settings
    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(
            Arc::new(RamlParser::from_settings(&config.conversion)),
            config.widget.clone(),
        )
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    /// Append a RAML widget delegating to the first OpenAPI widget
    ///
    /// `None` yields an empty list. A list without an OpenAPI widget is
    /// returned as the same `Arc`.
    pub fn augment<E: Renderable + 'static>(
        &self,
        widgets: Option<Arc<Vec<ApiDefinitionWidget<E>>>>,
    ) -> Arc<Vec<ApiDefinitionWidget<E>>> {
        let Some(widgets) = widgets else {
            return Arc::new(Vec::new());
        };

        let Some(openapi) = by_type(&widgets, &self.settings.openapi_type) else {
            tracing::debug!(
                "No '{}' widget registered, leaving widgets unchanged",
                self.settings.openapi_type
            );
            return widgets;
        };

        let raml = create_raml_widget(
            openapi,
            Arc::clone(&self.parser),
            &self.settings.raml_type,
            &self.settings.raml_title,
        );
        tracing::debug!(
            "Registering '{}' widget backed by '{}'",
            self.settings.raml_type,
            self.settings.openapi_type
        );

        let mut augmented = Vec::with_capacity(widgets.len() + 1);
        augmented.extend(widgets.iter().cloned());
        augmented.push(raml);
        Arc::new(augmented)
    }
}

impl Default for WidgetAugmenter {
    fn default() -> Self {
        Self::new(RamlParser::shared(), WidgetSettings::default())
    }
}

/// Augment a widget list using the process-wide parser and stock widget identifiers
pub fn add_raml_definition_widget<E: Renderable + 'static>(
    widgets: Option<Arc<Vec<ApiDefinitionWidget<E>>>>,
) -> Arc<Vec<ApiDefinitionWidget<E>>> {
    WidgetAugmenter::default().augment(widgets)
}
