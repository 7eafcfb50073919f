//! Common types and utilities for RAML API Docs
//!
//! This crate contains the shared data structures, error types and
//! configuration used across the parser, widget and CLI components.

mod config;

pub use config::{ConversionSettings, PluginConfig, WidgetSettings};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Header marker that identifies a RAML 0.8 definition
pub const RAML_08_HEADER: &str = "#%RAML 0.8";

/// Header marker that identifies a RAML 1.0 definition
pub const RAML_10_HEADER: &str = "#%RAML 1.0";

/// Failures raised by the external modeling layer
///
/// These are propagated verbatim through strategies and the dispatcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelingError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    /// Opaque failure whose message is passed through untouched
    #[error("{0}")]
    External(String),
}

/// Errors that can occur while converting a RAML definition
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Unsupported RAML version: {0}")]
    UnsupportedVersion(String),

    #[error(transparent)]
    Modeling(#[from] ModelingError),

    #[error("Async runtime unavailable: {0}")]
    Runtime(String),
}

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConversionError>;

/// RAML grammar version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RamlVersion {
    #[serde(rename = "0.8")]
    V08,
    #[serde(rename = "1.0")]
    V10,
}

impl RamlVersion {
    /// Version tag as it appears in the RAML header
    pub fn as_str(&self) -> &'static str {
        match self {
            RamlVersion::V08 => "0.8",
            RamlVersion::V10 => "1.0",
        }
    }

    /// Header line expected at the top of a definition of this version
    pub fn header(&self) -> &'static str {
        match self {
            RamlVersion::V08 => RAML_08_HEADER,
            RamlVersion::V10 => RAML_10_HEADER,
        }
    }

    /// Detect the version of a definition from its leading marker.
    ///
    /// Anything that does not start with the 0.8 header is treated as 1.0.
    pub fn detect(definition: &str) -> Self {
        if definition.starts_with(RAML_08_HEADER) {
            RamlVersion::V08
        } else {
            RamlVersion::V10
        }
    }
}

impl fmt::Display for RamlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RamlVersion {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "0.8" => Ok(RamlVersion::V08),
            "1.0" => Ok(RamlVersion::V10),
            other => Err(ConversionError::UnsupportedVersion(other.to_string())),
        }
    }
}

/// Output document format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "oas20")]
    Oas20,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Oas20 => f.write_str("oas20"),
        }
    }
}

/// Parser configuration; fully determines conversion of a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    pub version: RamlVersion,

    #[serde(default)]
    pub output_format: OutputFormat,
}

impl ParserConfig {
    pub fn new(version: RamlVersion) -> Self {
        Self {
            version,
            output_format: OutputFormat::Oas20,
        }
    }

    /// Build a config for the version detected from the definition header
    pub fn for_definition(definition: &str) -> Self {
        Self::new(RamlVersion::detect(definition))
    }
}

/// Observable state of one in-flight or completed conversion
#[derive(Debug, Clone)]
pub struct HookResponse<T> {
    pub data: T,
    pub is_loading: bool,
    pub error: Option<Arc<ConversionError>>,
}

impl<T: Default> HookResponse<T> {
    pub fn loading() -> Self {
        Self {
            data: T::default(),
            is_loading: true,
            error: None,
        }
    }

    pub fn success(data: T) -> Self {
        Self {
            data,
            is_loading: false,
            error: None,
        }
    }

    pub fn failed(error: ConversionError) -> Self {
        Self {
            data: T::default(),
            is_loading: false,
            error: Some(Arc::new(error)),
        }
    }

    /// True once the conversion reached Success or Failed
    pub fn is_settled(&self) -> bool {
        !self.is_loading
    }
}

impl<T: Default> Default for HookResponse<T> {
    fn default() -> Self {
        Self::loading()
    }
}
