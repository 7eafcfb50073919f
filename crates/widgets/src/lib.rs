//! RAML documentation widget
//!
//! Hosts that render API documentation through a registry of widgets pass
//! their registry through [`add_raml_definition_widget`]. When an OpenAPI
//! widget is present, a RAML widget is appended that converts RAML 0.8/1.0
//! definitions to OpenAPI 2.0 and renders them with the OpenAPI widget.
//!
//! ```rust,ignore
//! use raml_api_docs_widgets::{add_raml_definition_widget, ApiDefinitionWidget};
//! use std::sync::Arc;
//!
//! let widgets = Arc::new(vec![ApiDefinitionWidget::new("openapi", "OpenAPI", render_openapi)]);
//! let widgets = add_raml_definition_widget(Some(widgets));
//! ```

mod augment;
mod raml_widget;
mod widget;

pub use augment::{add_raml_definition_widget, WidgetAugmenter};
pub use raml_widget::{create_raml_widget, RamlDefinitionWidget};
pub use widget::{by_type, ApiDefinitionWidget, Renderable, WidgetComponent};

pub use raml_api_docs_common::{ConversionError, PluginConfig, WidgetSettings};

/// Widget type of the host's OpenAPI widget
pub const OPENAPI_WIDGET_TYPE: &str = "openapi";

/// Widget type registered for RAML definitions
pub const RAML_WIDGET_TYPE: &str = "raml";

/// Display title of the RAML widget
pub const RAML_WIDGET_TITLE: &str = "RAML";
