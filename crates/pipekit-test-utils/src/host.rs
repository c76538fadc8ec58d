// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory host context for deterministic testing.
//!
//! `TestHost` implements `HostContext` with an `OptionTree` store, captured
//! errors, and a configuration bus driven by `publish_config()`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pipekit_core::{
    ConfigHandler, HostContext, InstallSlot, OptionStore, OptionTree, PipekitError, PluginLoader,
};
use serde_json::Value;

/// A host context for tests.
pub struct TestHost {
    options: Option<Arc<OptionTree>>,
    loader: Option<Arc<dyn PluginLoader>>,
    errors: Mutex<Vec<PipekitError>>,
    handlers: Mutex<HashMap<String, Vec<ConfigHandler>>>,
    installed: InstallSlot,
}

impl TestHost {
    /// A host with an empty option store and no loader.
    pub fn new() -> Self {
        Self {
            options: Some(Arc::new(OptionTree::new())),
            loader: None,
            errors: Mutex::new(Vec::new()),
            handlers: Mutex::new(HashMap::new()),
            installed: InstallSlot::new(),
        }
    }

    /// A host that has not installed an option store.
    pub fn without_options() -> Self {
        Self {
            options: None,
            ..Self::new()
        }
    }

    /// A host with an option store and `loader` for plugin paths.
    pub fn with_loader(loader: impl PluginLoader + 'static) -> Self {
        Self {
            loader: Some(Arc::new(loader)),
            ..Self::new()
        }
    }

    /// The option store.
    ///
    /// # Panics
    ///
    /// Panics on a host built with [`without_options`](Self::without_options).
    pub fn options(&self) -> Arc<OptionTree> {
        self.options
            .clone()
            .expect("TestHost was built without an option store")
    }

    /// Drain every error emitted so far.
    pub fn take_errors(&self) -> Vec<PipekitError> {
        std::mem::take(&mut *self.errors.lock().unwrap())
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }

    /// Deliver `value` to every handler subscribed to `key`.
    ///
    /// Returns the first handler error.
    pub fn publish_config(&self, key: &str, value: &Value) -> Result<(), PipekitError> {
        let handlers = self.handlers.lock().unwrap();
        for handler in handlers.get(key).into_iter().flatten() {
            handler(value)?;
        }
        Ok(())
    }

    /// Number of handlers subscribed to `key`.
    pub fn subscribers(&self, key: &str) -> usize {
        self.handlers
            .lock()
            .unwrap()
            .get(key)
            .map_or(0, Vec::len)
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostContext for TestHost {
    fn option_store(&self) -> Option<Arc<dyn OptionStore>> {
        self.options
            .clone()
            .map(|store| store as Arc<dyn OptionStore>)
    }

    fn emit_error(&self, error: PipekitError) {
        self.errors.lock().unwrap().push(error);
    }

    fn plugin_loader(&self) -> Option<Arc<dyn PluginLoader>> {
        self.loader.clone()
    }

    fn on_config_key(&self, key: &str, handler: ConfigHandler) -> bool {
        self.handlers
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push(handler);
        true
    }

    fn install_slot(&self) -> Option<&InstallSlot> {
        Some(&self.installed)
    }
}
