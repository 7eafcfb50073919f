//! Plugin configuration loaded from YAML files
//!
//! Every field has a default, so an empty document (or no file at all)
//! yields the stock widget identifiers with caching enabled.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root structure for plugin configuration YAML files
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Widget registry identifiers
    pub widget: WidgetSettings,
    /// Conversion behavior
    pub conversion: ConversionSettings,
}

/// Identifiers used when augmenting the host's widget registry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WidgetSettings {
    /// Type of the host's OpenAPI widget (e.g., "openapi")
    pub openapi_type: String,
    /// Type registered for the RAML widget
    pub raml_type: String,
    /// Display title of the RAML widget
    pub raml_title: String,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            openapi_type: "openapi".to_string(),
            raml_type: "raml".to_string(),
            raml_title: "RAML".to_string(),
        }
    }
}

/// Conversion settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversionSettings {
    /// Memoize conversion results per (version, definition)
    pub cache_enabled: bool,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            cache_enabled: true,
        }
    }
}

impl PluginConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}
