// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry: name to implementation bindings.
//!
//! The `PluginRegistry` keeps bindings in registration order and records
//! declared default options in the host's option store under
//! `plugin.<name>`, where the resolver later reads them back.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use pipekit_core::types::plugin_option_path;
use pipekit_core::{Implementation, OptionStore, Options, PipekitError};
use serde_json::Value;
use tracing::debug;

/// A registered plugin, as returned by [`PluginRegistry::list_all`].
#[derive(Debug, Clone)]
pub struct PluginEntry {
    /// Name the plugin was registered under.
    pub name: String,
    /// Current binding.
    pub implementation: Implementation,
}

#[derive(Default)]
struct Bindings {
    order: Vec<String>,
    by_name: HashMap<String, Implementation>,
}

/// Registry of named plugins.
///
/// Re-registering a name overwrites its binding but keeps its original
/// position in [`names`](Self::names). Entries are never removed.
pub struct PluginRegistry {
    store: Arc<dyn OptionStore>,
    bindings: RwLock<Bindings>,
}

impl PluginRegistry {
    /// Create an empty registry writing defaults into `store`.
    pub fn new(store: Arc<dyn OptionStore>) -> Self {
        Self {
            store,
            bindings: RwLock::new(Bindings::default()),
        }
    }

    /// Bind `implementation` to `name` without default options.
    pub fn register(&self, name: &str, implementation: Implementation) -> Result<(), PipekitError> {
        self.register_with_options(name, &Options::new(), implementation)
    }

    /// Bind `implementation` to `name` and record its default options.
    ///
    /// Non-empty `options` are merged into the store at `plugin.<name>`;
    /// empty options leave the store untouched.
    pub fn register_with_options(
        &self,
        name: &str,
        options: &Options,
        implementation: Implementation,
    ) -> Result<(), PipekitError> {
        validate_name(name)?;

        if !options.is_empty() {
            self.store
                .set(&plugin_option_path(name), Value::Object(options.clone()));
        }

        let kind = implementation.kind();
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);
        let replaced = bindings
            .by_name
            .insert(name.to_string(), implementation)
            .is_some();
        if !replaced {
            bindings.order.push(name.to_string());
        }
        debug!(plugin = name, kind, replaced, "registered plugin");
        Ok(())
    }

    /// Current binding for `name`.
    pub fn lookup(&self, name: &str) -> Option<Implementation> {
        self.read().by_name.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().by_name.contains_key(name)
    }

    /// Snapshot of registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.read().order.clone()
    }

    /// Snapshot of every entry in registration order.
    pub fn list_all(&self) -> Vec<PluginEntry> {
        let bindings = self.read();
        bindings
            .order
            .iter()
            .filter_map(|name| {
                bindings.by_name.get(name).map(|implementation| PluginEntry {
                    name: name.clone(),
                    implementation: implementation.clone(),
                })
            })
            .collect()
    }

    /// Returns the number of registered plugins.
    pub fn len(&self) -> usize {
        self.read().order.len()
    }

    /// Returns true if no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.read().order.is_empty()
    }

    /// The option store defaults are written to.
    pub fn option_store(&self) -> &Arc<dyn OptionStore> {
        &self.store
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Bindings> {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn validate_name(name: &str) -> Result<(), PipekitError> {
    if name.trim().is_empty() {
        return Err(PipekitError::InvalidArgument(
            "expected plugin name to be a string (non-empty)".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipekit_core::{OptionTree, Unit};
    use serde_json::json;

    fn registry() -> (Arc<OptionTree>, PluginRegistry) {
        let store = Arc::new(OptionTree::new());
        let registry = PluginRegistry::new(store.clone());
        (store, registry)
    }

    fn opts(value: Value) -> Options {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn register_and_lookup_roundtrip() {
        let (_, registry) = registry();
        registry
            .register("foo", Implementation::factory(|_, input| input))
            .unwrap();

        assert!(registry.contains("foo"));
        assert_eq!(registry.lookup("foo").map(|i| i.kind()), Some("factory"));
        assert!(registry.lookup("bar").is_none());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let (_, registry) = registry();
        registry.register("Lint", Implementation::Empty).unwrap();
        assert!(registry.lookup("lint").is_none());
        assert!(registry.lookup("Lint").is_some());
    }

    #[test]
    fn empty_name_is_rejected() {
        let (_, registry) = registry();
        let err = registry.register("", Implementation::Empty).unwrap_err();
        assert!(matches!(err, PipekitError::InvalidArgument(_)));
        assert!(err.to_string().contains("to be a string"));

        let err = registry.register("   ", Implementation::Empty).unwrap_err();
        assert!(matches!(err, PipekitError::InvalidArgument(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn names_follow_registration_order() {
        let (_, registry) = registry();
        for name in ["zebra", "alpha", "middle"] {
            registry.register(name, Implementation::Empty).unwrap();
        }
        assert_eq!(registry.names(), ["zebra", "alpha", "middle"]);
    }

    #[test]
    fn overwrite_keeps_position_and_replaces_binding() {
        let (_, registry) = registry();
        registry.register("a", Implementation::Empty).unwrap();
        registry.register("b", Implementation::Empty).unwrap();
        registry
            .register("a", Implementation::Unit(Unit::pass_through()))
            .unwrap();

        assert_eq!(registry.names(), ["a", "b"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("a").map(|i| i.kind()), Some("unit"));

        let all = registry.list_all();
        assert_eq!(all[0].name, "a");
        assert_eq!(all[0].implementation.kind(), "unit");
    }

    #[test]
    fn options_written_under_plugin_namespace() {
        let (store, registry) = registry();
        registry
            .register_with_options("a", &opts(json!({"foo": "bar"})), Implementation::Empty)
            .unwrap();
        assert_eq!(store.get(&["plugin", "a"]), Some(json!({"foo": "bar"})));

        registry
            .register_with_options("a", &opts(json!({"extra": 1})), Implementation::Empty)
            .unwrap();
        assert_eq!(
            store.get(&["plugin", "a"]),
            Some(json!({"foo": "bar", "extra": 1}))
        );
    }

    #[test]
    fn empty_options_leave_store_untouched() {
        let (store, registry) = registry();
        registry.register("a", Implementation::Empty).unwrap();
        assert_eq!(store.get(&["plugin", "a"]), None);
    }

    #[test]
    fn len_and_is_empty() {
        let (_, registry) = registry();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);

        registry.register("test", Implementation::Empty).unwrap();
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 1);
    }
}
