// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks serde cannot express.

use serde_json::Value;

use crate::diagnostic::ConfigError;
use crate::model::PipekitConfig;

/// Validate a deserialized configuration, collecting every problem.
pub fn validate_config(config: &PipekitConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.pipeline.channel_capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "pipeline.channel_capacity must be at least 1".to_string(),
        });
    }

    for (name, value) in &config.plugin {
        if name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "plugin option tables need a non-empty plugin name".to_string(),
            });
        }
        if !matches!(value, Value::Object(_) | Value::Bool(_)) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "plugin.{name} must be a table of options or a boolean, got {}",
                    value_kind(value)
                ),
            });
        }
    }

    for (key, value) in &config.plugins {
        if key.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "plugins entries need a non-empty name or path".to_string(),
            });
        }
        match value {
            Value::String(path) if path.trim().is_empty() => {
                errors.push(ConfigError::Validation {
                    message: format!("plugins.{key} must not be an empty path"),
                });
            }
            Value::String(_) | Value::Object(_) => {}
            other => errors.push(ConfigError::Validation {
                message: format!(
                    "plugins.{key} must be a path string or a table of options, got {}",
                    value_kind(other)
                ),
            }),
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_with(plugin: Value, plugins: Value) -> PipekitConfig {
        PipekitConfig {
            plugin: plugin.as_object().cloned().unwrap_or_default(),
            plugins: plugins.as_object().cloned().unwrap_or_default(),
            ..Default::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&PipekitConfig::default()).is_ok());
    }

    #[test]
    fn zero_capacity_rejected() {
        let mut config = PipekitConfig::default();
        config.pipeline.channel_capacity = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("channel_capacity"));
    }

    #[test]
    fn plugin_tables_and_booleans_accepted() {
        let config = config_with(json!({"lint": {"fix": true}, "coverage": false}), json!({}));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn plugin_scalar_rejected() {
        let config = config_with(json!({"lint": 3}), json!({}));
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("plugin.lint"));
    }

    #[test]
    fn plugins_array_rejected_and_all_errors_collected() {
        let config = config_with(json!({}), json!({"a": ["x"], "b": "", "c": "ok.wasm"}));
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
