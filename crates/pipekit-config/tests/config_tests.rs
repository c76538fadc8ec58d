// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Pipekit configuration system.

use std::io::Write;

use pipekit_config::diagnostic::ConfigError;
use pipekit_config::{
    LogLevel, load_and_validate_path, load_and_validate_str, load_config_from_str,
};
use serde_json::json;

/// A config using every section deserializes.
#[test]
fn full_config_deserializes() {
    let toml = r#"
[pipeline]
channel_capacity = 4
log_level = "debug"

[plugin]
coverage = false

[plugin.lint]
fix = true
rules = ["no-var"]

[plugins]
lint = "plugins/lint.wasm"
"plugins/mocha.wasm" = { reporter = "spec" }
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.pipeline.channel_capacity, 4);
    assert_eq!(config.pipeline.log_level, LogLevel::Debug);
    assert_eq!(config.plugin["coverage"], json!(false));
    assert_eq!(config.plugin["lint"], json!({"fix": true, "rules": ["no-var"]}));
    assert_eq!(config.plugins["lint"], json!("plugins/lint.wasm"));
    assert_eq!(config.plugins["plugins/mocha.wasm"], json!({"reporter": "spec"}));
}

/// An empty file yields compiled defaults.
#[test]
fn empty_config_uses_defaults() {
    let config = load_and_validate_str("").expect("empty config is valid");
    assert_eq!(config.pipeline.channel_capacity, 16);
    assert_eq!(config.pipeline.log_level, LogLevel::Info);
    assert!(config.plugins.is_empty());
}

/// A misspelled key in `[pipeline]` is reported with a suggestion.
#[test]
fn unknown_pipeline_key_suggests_correction() {
    let toml = r#"
[pipeline]
chanel_capacity = 4
"#;

    let errors = load_and_validate_str(toml).expect_err("unknown key must be rejected");
    let found = errors.iter().any(|e| match e {
        ConfigError::UnknownKey { key, suggestion, .. } => {
            key == "chanel_capacity" && suggestion.as_deref() == Some("channel_capacity")
        }
        _ => false,
    });
    assert!(found, "expected UnknownKey with suggestion, got: {errors:?}");
}

/// An unknown top-level section is rejected.
#[test]
fn unknown_top_level_section_rejected() {
    let errors = load_and_validate_str("[pipelines]\nchannel_capacity = 4\n")
        .expect_err("unknown section must be rejected");
    assert!(errors.iter().any(|e| matches!(e, ConfigError::UnknownKey { .. })));
}

/// An unknown log level is reported as an invalid value.
#[test]
fn invalid_log_level_reported() {
    let errors = load_and_validate_str("[pipeline]\nlog_level = \"warning\"\n")
        .expect_err("unknown log level must be rejected");
    let found = errors.iter().any(|e| match e {
        ConfigError::InvalidValue { suggestion, .. } => suggestion.as_deref() == Some("warn"),
        _ => false,
    });
    assert!(found, "expected InvalidValue suggesting `warn`, got: {errors:?}");
}

/// A wrongly typed value is an InvalidType error.
#[test]
fn wrong_type_reported() {
    let errors = load_and_validate_str("[pipeline]\nchannel_capacity = \"many\"\n")
        .expect_err("string capacity must be rejected");
    assert!(errors.iter().any(|e| matches!(e, ConfigError::InvalidType { .. })));
}

/// Semantic validation runs after deserialization.
#[test]
fn validation_errors_surface() {
    let toml = r#"
[pipeline]
channel_capacity = 0

[plugins]
broken = 42
"#;

    let errors = load_and_validate_str(toml).expect_err("invalid values must be rejected");
    let validations = errors
        .iter()
        .filter(|e| matches!(e, ConfigError::Validation { .. }))
        .count();
    assert_eq!(validations, 2, "got: {errors:?}");
}

/// Configuration can be read from an explicit file.
#[test]
fn loads_from_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    writeln!(file, "[plugin.a]\nfoo = \"bar\"").expect("write config");

    let config = load_and_validate_path(file.path()).expect("file config is valid");
    assert_eq!(config.plugin["a"], json!({"foo": "bar"}));
}

/// `[plugins]` keeps the order the file declares, not alphabetical order.
#[test]
fn plugins_keep_declared_order() {
    let toml = r#"
[plugins]
zeta = "plugins/zeta.wasm"
"plugins/mocha.wasm" = { reporter = "spec" }
alpha = "plugins/alpha.wasm"
"#;

    let config = load_and_validate_str(toml).expect("valid config");
    let keys: Vec<&str> = config.plugins.keys().map(String::as_str).collect();
    assert_eq!(keys, ["zeta", "plugins/mocha.wasm", "alpha"]);
}

/// Declared order survives loading from a file as well.
#[test]
fn plugins_keep_declared_order_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[plugins]\nlint = \"l.wasm\"\nformat = \"f.wasm\"").expect("write config");

    let config = load_and_validate_path(file.path()).expect("valid config");
    let keys: Vec<&str> = config.plugins.keys().map(String::as_str).collect();
    assert_eq!(keys, ["lint", "format"]);
}
