// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning references into runnable units.
//!
//! Every reference resolves to zero or one unit. Disabled plugins,
//! unregistered names, empty implementations, and misplaced entries
//! resolve to nothing instead of failing the build.

use pipekit_core::types::{merge_options, plugin_disable_path, plugin_option_path};
use pipekit_core::{HostContext, Implementation, OptionStore, Options, PipekitError, Unit};
use serde_json::Value;
use tracing::{debug, warn};

use crate::reference::Reference;
use crate::registry::PluginRegistry;

/// True when `plugin.<name>` is `false` or `plugin.<name>.disable` is `true`.
pub fn is_disabled(store: &dyn OptionStore, name: &str) -> bool {
    store.is_false(&plugin_option_path(name)) || store.is_true(&plugin_disable_path(name))
}

/// Resolves references against one registry for one build.
pub struct Resolver<'a> {
    registry: &'a PluginRegistry,
    host: &'a dyn HostContext,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a PluginRegistry, host: &'a dyn HostContext) -> Self {
        Self { registry, host }
    }

    /// Resolve one reference with the build's merged options.
    pub fn resolve(&self, reference: &Reference, options: &Options) -> Option<Unit> {
        match reference {
            Reference::Name(name) => self.resolve_name(name, options, &mut Vec::new()),
            Reference::Factory(factory) => Some(factory.invoke(options, Unit::pass_through())),
            Reference::Unit(unit) => Some(unit.clone()),
            Reference::Many(_) | Reference::Options(_) => {
                debug!("skipping pipeline entry that is neither a name, a factory, nor a unit");
                None
            }
        }
    }

    fn resolve_name(&self, name: &str, options: &Options, chain: &mut Vec<String>) -> Option<Unit> {
        // Cloned out of the registry so no lock is held while factories run.
        let Some(implementation) = self.registry.lookup(name) else {
            debug!(plugin = name, "skipping unregistered plugin");
            return None;
        };

        if chain.iter().any(|seen| seen == name) {
            chain.push(name.to_string());
            warn!(chain = %chain.join(" -> "), "skipping plugin alias cycle");
            self.host.emit_error(PipekitError::AliasCycle {
                chain: chain.clone(),
            });
            return None;
        }

        let store = self.registry.option_store().as_ref();
        if is_disabled(store, name) {
            debug!(plugin = name, "skipping disabled plugin");
            return None;
        }

        let effective = match store.get(&plugin_option_path(name)) {
            Some(Value::Object(defaults)) => merge_options(&defaults, options),
            _ => options.clone(),
        };

        chain.push(name.to_string());
        let unit = self.resolve_implementation(implementation, &effective, chain);
        chain.pop();
        unit
    }

    fn resolve_implementation(
        &self,
        implementation: Implementation,
        options: &Options,
        chain: &mut Vec<String>,
    ) -> Option<Unit> {
        match implementation {
            Implementation::Alias(target) => self.resolve_name(&target, options, chain),
            Implementation::Factory(factory) => Some(factory.invoke(options, Unit::pass_through())),
            Implementation::Unit(unit) => Some(unit),
            Implementation::Empty => None,
        }
    }
}
