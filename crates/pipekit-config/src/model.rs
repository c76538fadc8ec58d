// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model for the Pipekit composer.
//!
//! ```toml
//! [pipeline]
//! channel_capacity = 32
//! log_level = "debug"
//!
//! # Per-plugin default options, or `false` to disable a plugin.
//! [plugin.lint]
//! fix = true
//!
//! [plugin]
//! coverage = false
//!
//! # Declarative registration: name -> path, or path -> options.
//! [plugins]
//! lint = "plugins/lint.wasm"
//! "plugins/mocha.wasm" = { reporter = "spec" }
//! ```

use pipekit_core::DEFAULT_CHANNEL_CAPACITY;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Top-level Pipekit configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipekitConfig {
    /// Pipeline runtime settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Per-plugin option tables (or booleans), seeded under `plugin.<name>`.
    #[serde(default)]
    pub plugin: Map<String, Value>,

    /// Declarative plugin definitions applied through the host's loader.
    #[serde(default)]
    pub plugins: Map<String, Value>,
}

/// Runtime settings for composed pipelines.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Capacity of the bounded channel between two stages.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Log level for the `pipekit` targets.
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            log_level: LogLevel::default(),
        }
    }
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

/// Verbosity accepted by `pipeline.log_level`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Names accepted in configuration, for diagnostics.
    pub const VARIANTS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];
}
