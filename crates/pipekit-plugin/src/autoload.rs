// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative plugin registration from a `plugins` configuration mapping.
//!
//! Each entry maps a key to a definition:
//! - a factory is registered under the key;
//! - a string is a resource path, loaded and registered under its base name;
//! - a table holds default options for a plugin loaded from the key itself,
//!   registered under the key's base name.

use std::collections::HashMap;
use std::path::Path;

use pipekit_core::{Factory, Implementation, Options, PipekitError, PluginLoader};
use serde_json::{Map, Value};
use tracing::debug;

use crate::registry::PluginRegistry;

/// Configuration key the plugin host subscribes to.
pub const PLUGINS_CONFIG_KEY: &str = "plugins";

/// The value side of one `plugins` entry.
#[derive(Clone, Debug)]
pub enum PluginDefinition {
    Factory(Factory),
    Path(String),
    Options(Options),
    /// Any other shape; applying it is a configuration error.
    Invalid(Value),
}

impl From<Value> for PluginDefinition {
    fn from(value: Value) -> Self {
        match value {
            Value::String(path) => PluginDefinition::Path(path),
            Value::Object(options) => PluginDefinition::Options(options),
            other => PluginDefinition::Invalid(other),
        }
    }
}

impl From<Factory> for PluginDefinition {
    fn from(factory: Factory) -> Self {
        PluginDefinition::Factory(factory)
    }
}

/// Definitions from a raw JSON mapping, in key order.
pub fn definitions_from_map(map: &Map<String, Value>) -> Vec<(String, PluginDefinition)> {
    map.iter()
        .map(|(key, value)| (key.clone(), PluginDefinition::from(value.clone())))
        .collect()
}

/// Definitions from the raw value published under the `plugins` key.
pub fn definitions_from_value(value: &Value) -> Result<Vec<(String, PluginDefinition)>, PipekitError> {
    match value {
        Value::Object(map) => Ok(definitions_from_map(map)),
        other => Err(PipekitError::Config(format!(
            "`{PLUGINS_CONFIG_KEY}` must map plugin names to definitions, got {other}"
        ))),
    }
}

/// Register every definition, stopping at the first one that fails.
///
/// Returns the number of plugins registered.
pub fn apply_definitions<I>(
    registry: &PluginRegistry,
    loader: Option<&dyn PluginLoader>,
    definitions: I,
) -> Result<usize, PipekitError>
where
    I: IntoIterator<Item = (String, PluginDefinition)>,
{
    let mut applied = 0;
    for (key, definition) in definitions {
        match definition {
            PluginDefinition::Factory(factory) => {
                registry.register(&key, Implementation::Factory(factory))?;
            }
            PluginDefinition::Path(path) => {
                let implementation = load(loader, &path)?;
                registry.register(base_name(&path), implementation)?;
            }
            PluginDefinition::Options(options) => {
                let implementation = load(loader, &key)?;
                registry.register_with_options(base_name(&key), &options, implementation)?;
            }
            PluginDefinition::Invalid(value) => {
                return Err(PipekitError::Config(format!(
                    "invalid plugin definition `{key}` = {value}: expected a factory, a path, or a table of options"
                )));
            }
        }
        debug!(key = %key, "applied plugin definition");
        applied += 1;
    }
    Ok(applied)
}

fn load(loader: Option<&dyn PluginLoader>, path: &str) -> Result<Implementation, PipekitError> {
    let loader = loader.ok_or_else(|| {
        PipekitError::Config(format!(
            "cannot load plugin `{path}`: the host provides no plugin loader"
        ))
    })?;
    loader.load(path)
}

/// File name of `path` without its extension: `plugins/lint.wasm` -> `lint`.
pub fn base_name(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(path)
}

/// A loader backed by an explicit path table supplied by the host.
#[derive(Clone, Debug, Default)]
pub struct StaticLoader {
    bindings: HashMap<String, Implementation>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `path` to `implementation`, builder style.
    pub fn with(mut self, path: impl Into<String>, implementation: impl Into<Implementation>) -> Self {
        self.insert(path, implementation);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, implementation: impl Into<Implementation>) {
        self.bindings.insert(path.into(), implementation.into());
    }
}

impl PluginLoader for StaticLoader {
    fn load(&self, path: &str) -> Result<Implementation, PipekitError> {
        self.bindings
            .get(path)
            .cloned()
            .ok_or_else(|| PipekitError::Config(format!("no plugin is bound to path `{path}`")))
    }
}
