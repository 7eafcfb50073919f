//! Widget registry entries shared with the host

use raml_api_docs_common::ConversionError;
use std::fmt;
use std::sync::Arc;

/// Renders an API definition into a host element
pub type WidgetComponent<E> = Arc<dyn Fn(&str) -> E + Send + Sync>;

/// Element types the RAML widget can produce on its own
pub trait Renderable {
    /// Placeholder shown while a conversion is in flight
    fn progress() -> Self;

    /// Element shown when a conversion failed
    fn error(error: &ConversionError) -> Self;
}

/// An entry in the host's widget registry
pub struct ApiDefinitionWidget<E> {
    pub widget_type: String,
    pub title: String,
    pub component: WidgetComponent<E>,
}

impl<E> ApiDefinitionWidget<E> {
    pub fn new(
        widget_type: impl Into<String>,
        title: impl Into<String>,
        component: impl Fn(&str) -> E + Send + Sync + 'static,
    ) -> Self {
        Self {
            widget_type: widget_type.into(),
            title: title.into(),
            component: Arc::new(component),
        }
    }

    /// Render a definition with this widget's component
    pub fn render(&self, definition: &str) -> E {
        (self.component)(definition)
    }
}

impl<E> Clone for ApiDefinitionWidget<E> {
    fn clone(&self) -> Self {
        Self {
            widget_type: self.widget_type.clone(),
            title: self.title.clone(),
            component: Arc::clone(&self.component),
        }
    }
}

impl<E> fmt::Debug for ApiDefinitionWidget<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiDefinitionWidget")
            .field("widget_type", &self.widget_type)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// First widget registered under `widget_type`
pub fn by_type<'a, E>(
    widgets: &'a [ApiDefinitionWidget<E>],
    widget_type: &str,
) -> Option<&'a ApiDefinitionWidget<E>> {
    widgets.iter().find(|w| w.widget_type == widget_type)
}
