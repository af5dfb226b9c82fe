#![deny(missing_docs)]

//! # Settings
//!
//! Configuration consumed by the translator. Loaded from an optional YAML/JSON
//! file; every field has a default so an empty file is valid.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default route template used when a method carries no explicit route.
pub const DEFAULT_URL_TEMPLATE: &str = "api/{controller}/{action}/{id}";

/// Methods with this name are treated as self-description endpoints and skipped.
pub const DEFAULT_EXCLUDED_METHOD_NAME: &str = "Swagger";

/// Schema generation flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSettings {
    /// Whether the universal "any" schema allows additional properties.
    pub allow_additional_properties_on_any: bool,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            allow_additional_properties_on_any: true,
        }
    }
}

/// Translator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Route template with `{controller}` / `{action}` placeholders.
    pub default_url_template: String,
    /// Method name excluded from every group.
    pub excluded_method_name: String,
    /// Document title.
    pub title: String,
    /// Document version.
    pub version: String,
    /// Schema generation flags.
    pub schema: SchemaSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_url_template: DEFAULT_URL_TEMPLATE.to_string(),
            excluded_method_name: DEFAULT_EXCLUDED_METHOD_NAME.to_string(),
            title: "Web API".to_string(),
            version: "1.0.0".to_string(),
            schema: SchemaSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| AppError::General(format!("Failed to parse settings JSON: {}", e))),
            _ => serde_yaml::from_str(&content)
                .map_err(|e| AppError::General(format!("Failed to parse settings YAML: {}", e))),
        }
    }

    /// Sets the default route template.
    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.default_url_template = template.into();
        self
    }

    /// Sets the excluded method name.
    pub fn with_excluded_method_name(mut self, name: impl Into<String>) -> Self {
        self.excluded_method_name = name.into();
        self
    }
}
