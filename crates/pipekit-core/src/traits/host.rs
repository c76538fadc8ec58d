// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capabilities the composer consumes from its host application.

use std::any::Any;
use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::error::PipekitError;
use crate::traits::loader::PluginLoader;
use crate::traits::options::OptionStore;

/// Callback invoked when the host's configuration publishes a key.
pub type ConfigHandler = Box<dyn Fn(&Value) -> Result<(), PipekitError> + Send + Sync>;

/// Slot a plugin host claims the first time it is installed into a context.
///
/// Later installations into the same context find the claimed value and
/// share it instead of starting over.
pub type InstallSlot = OnceLock<Arc<dyn Any + Send + Sync>>;

/// The host context a plugin host is installed into.
///
/// Only the option store is mandatory. Hosts without declarative
/// configuration keep the default `plugin_loader` and `on_config_key`.
pub trait HostContext: Send + Sync {
    /// The option store, or `None` when the host has not installed one.
    fn option_store(&self) -> Option<Arc<dyn OptionStore>>;

    /// Error channel receiving faults raised while pipelines run.
    fn emit_error(&self, error: PipekitError);

    /// Loader used for plugin paths found in configuration.
    fn plugin_loader(&self) -> Option<Arc<dyn PluginLoader>> {
        None
    }

    /// Subscribe `handler` to a configuration key.
    ///
    /// Returns false when the host has no configuration to subscribe to.
    fn on_config_key(&self, _key: &str, _handler: ConfigHandler) -> bool {
        false
    }

    /// Slot recording an installed plugin host.
    ///
    /// Contexts without one get a fresh, independent host per installation.
    fn install_slot(&self) -> Option<&InstallSlot> {
        None
    }
}
