//! Widget component that renders RAML through the host's OpenAPI widget

use crate::widget::{ApiDefinitionWidget, Renderable, WidgetComponent};
use raml_api_docs_common::HookResponse;
use raml_api_docs_parser::{RamlParser, RamlToOpenApi};
use std::sync::Arc;
use tokio::sync::watch;

/// Converts RAML definitions and hands the OpenAPI result to a delegate component
///
/// Rendering never blocks: the first render of a definition starts the
/// conversion and shows progress. Conversion state is kept per definition,
/// so views showing different definitions do not supersede each other.
/// Hosts re-render when the receiver from [`RamlDefinitionWidget::subscribe`]
/// changes.
pub struct RamlDefinitionWidget<E> {
    openapi: WidgetComponent<E>,
    parser: Arc<RamlParser>,
    adapters: papaya::HashMap<String, Arc<RamlToOpenApi>>,
}

impl<E: Renderable> RamlDefinitionWidget<E> {
    pub fn new(openapi: WidgetComponent<E>, parser: Arc<RamlParser>) -> Self {
        Self {
            openapi,
            parser,
            adapters: papaya::HashMap::new(),
        }
    }

    /// Render `definition`, starting its conversion on first sight
    pub fn render(&self, definition: &str) -> E {
        let adapter = self.adapter(definition);
        adapter.request(definition);

        let state = adapter.state();
        if state.is_loading {
            return E::progress();
        }
        if let Some(error) = &state.error {
            return E::error(error);
        }
        (self.openapi)(&state.data)
    }

    /// Receiver notified whenever the conversion state of `definition` changes
    ///
    /// `None` until the definition has been rendered.
    pub fn subscribe(&self, definition: &str) -> Option<watch::Receiver<HookResponse<String>>> {
        self.existing(definition).map(|adapter| adapter.subscribe())
    }

    /// Wait for the conversion of a rendered definition to finish
    pub async fn settled(&self, definition: &str) -> Option<HookResponse<String>> {
        let adapter = self.existing(definition)?;
        Some(adapter.settled().await)
    }

    /// Drop the conversion state kept for `definition`
    pub fn release(&self, definition: &str) {
        self.adapters.pin().remove(definition);
    }

    /// Number of definitions with conversion state
    pub fn tracked(&self) -> usize {
        self.adapters.len()
    }

    fn adapter(&self, definition: &str) -> Arc<RamlToOpenApi> {
        let adapters = self.adapters.pin();
        let adapter = adapters.get_or_insert_with(definition.to_string(), || {
            Arc::new(RamlToOpenApi::new(Arc::clone(&self.parser)))
        });
        Arc::clone(adapter)
    }

    fn existing(&self, definition: &str) -> Option<Arc<RamlToOpenApi>> {
        self.adapters.pin().get(definition).map(Arc::clone)
    }
}

impl<E: Renderable + 'static> RamlDefinitionWidget<E> {
    /// Registry entry rendering through this widget
    pub fn into_widget(
        self: Arc<Self>,
        widget_type: impl Into<String>,
        title: impl Into<String>,
    ) -> ApiDefinitionWidget<E> {
        ApiDefinitionWidget::new(widget_type, title, move |definition: &str| {
            self.render(definition)
        })
    }
}

/// Build the RAML registry entry delegating to `openapi`
pub fn create_raml_widget<E: Renderable + 'static>(
    openapi: &ApiDefinitionWidget<E>,
    parser: Arc<RamlParser>,
    widget_type: &str,
    title: &str,
) -> ApiDefinitionWidget<E> {
    let widget = Arc::new(RamlDefinitionWidget::new(
        Arc::clone(&openapi.component),
        parser,
    ));
    widget.into_widget(widget_type, title)
}
