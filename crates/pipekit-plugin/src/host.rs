// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The installation surface: a plugin host bound to one host context.

use std::any::Any;
use std::sync::Arc;

use pipekit_config::{PipekitConfig, PipelineConfig};
use pipekit_core::types::plugin_option_path;
use pipekit_core::{
    DEFAULT_CHANNEL_CAPACITY, HostContext, Implementation, OptionStore, Options, PipekitError,
    Unit,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::autoload::{
    PLUGINS_CONFIG_KEY, PluginDefinition, apply_definitions, definitions_from_map,
    definitions_from_value,
};
use crate::pipeline::Pipeline;
use crate::reference::{Reference, Request, normalize};
use crate::registry::PluginRegistry;
use crate::resolver::Resolver;

/// Settings applied to every pipeline a host builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Capacity of the channels joining adjacent stages.
    pub channel_capacity: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl From<&PipelineConfig> for PipelineSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            channel_capacity: config.channel_capacity,
        }
    }
}

/// A plugin registry and pipeline composer installed into a host.
///
/// Clones share the same registry.
#[derive(Clone)]
pub struct PluginHost {
    context: Arc<dyn HostContext>,
    registry: Arc<PluginRegistry>,
    settings: PipelineSettings,
}

impl PluginHost {
    /// Install with default pipeline settings.
    pub fn install(context: Arc<dyn HostContext>) -> Result<Self, PipekitError> {
        Self::install_with(context, PipelineSettings::default())
    }

    /// Install into `context`, which must provide an option store.
    ///
    /// When the context supports configuration subscription, the host
    /// registers the definitions published under `plugins`. A context with
    /// an install slot gets one registry: installing again shares it and
    /// does not subscribe twice.
    pub fn install_with(
        context: Arc<dyn HostContext>,
        settings: PipelineSettings,
    ) -> Result<Self, PipekitError> {
        let store = context
            .option_store()
            .ok_or_else(|| PipekitError::MissingDependency {
                capability: "an option store".to_string(),
            })?;

        let registry = match context.install_slot() {
            Some(slot) => {
                let mut fresh = false;
                let claimed = slot.get_or_init(|| {
                    fresh = true;
                    let registry: Arc<dyn Any + Send + Sync> =
                        Self::start(context.as_ref(), store, settings);
                    registry
                });
                if !fresh {
                    debug!("plugin host already installed, sharing its registry");
                }
                Arc::clone(claimed)
                    .downcast::<PluginRegistry>()
                    .map_err(|_| {
                        PipekitError::Internal(
                            "install slot holds something other than a plugin registry"
                                .to_string(),
                        )
                    })?
            }
            None => Self::start(context.as_ref(), store, settings),
        };

        Ok(Self {
            context,
            registry,
            settings,
        })
    }

    /// Create the registry and subscribe it to `plugins` definitions.
    fn start(
        context: &dyn HostContext,
        store: Arc<dyn OptionStore>,
        settings: PipelineSettings,
    ) -> Arc<PluginRegistry> {
        let registry = Arc::new(PluginRegistry::new(store));

        // The handler must not own the context: hosts keep their handlers.
        let subscribed = {
            let registry = Arc::clone(&registry);
            let loader = context.plugin_loader();
            context.on_config_key(
                PLUGINS_CONFIG_KEY,
                Box::new(move |value: &Value| {
                    let definitions = definitions_from_value(value)?;
                    apply_definitions(&registry, loader.as_deref(), definitions).map(|_| ())
                }),
            )
        };

        info!(
            channel_capacity = settings.channel_capacity,
            subscribed, "plugin host installed"
        );
        registry
    }

    /// Install with settings from `config`, then apply its plugin sections.
    pub fn install_configured(
        context: Arc<dyn HostContext>,
        config: &PipekitConfig,
    ) -> Result<Self, PipekitError> {
        let host = Self::install_with(context, PipelineSettings::from(&config.pipeline))?;
        host.configure(config)?;
        Ok(host)
    }

    /// Register `implementation` under `name`.
    pub fn register(
        &self,
        name: &str,
        implementation: impl Into<Implementation>,
    ) -> Result<&Self, PipekitError> {
        self.registry.register(name, implementation.into())?;
        Ok(self)
    }

    /// Register `implementation` under `name` with default options.
    pub fn register_with_options(
        &self,
        name: &str,
        options: Options,
        implementation: impl Into<Implementation>,
    ) -> Result<&Self, PipekitError> {
        self.registry
            .register_with_options(name, &options, implementation.into())?;
        Ok(self)
    }

    pub fn lookup(&self, name: &str) -> Option<Implementation> {
        self.registry.lookup(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// The host's option store.
    pub fn options(&self) -> &Arc<dyn OptionStore> {
        self.registry.option_store()
    }

    pub fn settings(&self) -> PipelineSettings {
        self.settings
    }

    /// Build a pipeline from `request`.
    ///
    /// An empty request, or one holding only options, builds every
    /// registered plugin. A request holding a single unit returns it as is.
    pub fn build<I>(&self, request: I) -> Unit
    where
        I: IntoIterator,
        I::Item: Into<Reference>,
    {
        let args = request.into_iter().map(Into::into).collect();
        let plan = match normalize(args) {
            Request::Prebuilt(unit) => {
                debug!(stage = unit.name(), "returning prebuilt stage");
                return unit;
            }
            Request::Plan(plan) => plan,
        };

        let references = plan.references.unwrap_or_else(|| {
            self.registry
                .names()
                .into_iter()
                .map(Reference::Name)
                .collect()
        });

        let resolver = Resolver::new(&self.registry, self.context.as_ref());
        let resolved: Vec<Unit> = references
            .iter()
            .filter_map(|reference| resolver.resolve(reference, &plan.options))
            .collect();

        debug!(
            requested = references.len(),
            resolved = resolved.len(),
            "built pipeline"
        );
        Unit::new(Pipeline::new(
            resolved,
            Arc::clone(&self.context),
            self.settings.channel_capacity,
        ))
    }

    /// Build every registered plugin with no build options.
    pub fn build_all(&self) -> Unit {
        self.build(Vec::<Reference>::new())
    }

    /// Build every registered plugin with `options`.
    pub fn build_with(&self, options: Options) -> Unit {
        self.build([Reference::Options(options)])
    }

    /// Register declarative definitions, using the context's loader for paths.
    pub fn apply_definitions<I>(&self, definitions: I) -> Result<usize, PipekitError>
    where
        I: IntoIterator<Item = (String, PluginDefinition)>,
    {
        let loader = self.context.plugin_loader();
        apply_definitions(&self.registry, loader.as_deref(), definitions)
    }

    /// Seed `[plugin]` option tables into the store, then apply `[plugins]`.
    ///
    /// Returns the number of plugins registered from `[plugins]`.
    pub fn configure(&self, config: &PipekitConfig) -> Result<usize, PipekitError> {
        let store = self.options();
        for (name, value) in &config.plugin {
            store.set(&plugin_option_path(name), value.clone());
        }
        let applied = self.apply_definitions(definitions_from_map(&config.plugins))?;
        debug!(
            seeded = config.plugin.len(),
            applied, "applied plugin configuration"
        );
        Ok(applied)
    }
}

impl std::fmt::Debug for PluginHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHost")
            .field("plugins", &self.registry.names())
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipekit_test_utils::{TestHost, append_name, fixture};
    use serde_json::json;
    use tracing_test::traced_test;

    #[test]
    fn install_requires_option_store() {
        let err = PluginHost::install(Arc::new(TestHost::without_options())).unwrap_err();
        assert!(matches!(err, PipekitError::MissingDependency { .. }));
        assert!(err.to_string().contains("option store"));
    }

    #[test]
    fn reinstall_keeps_settings_per_host() {
        let context = Arc::new(TestHost::new());
        let first = PluginHost::install(context.clone()).unwrap();
        let second = PluginHost::install_with(
            context.clone(),
            PipelineSettings {
                channel_capacity: 2,
            },
        )
        .unwrap();

        assert_eq!(first.settings().channel_capacity, DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(second.settings().channel_capacity, 2);
        assert!(std::ptr::eq(first.registry(), second.registry()));
    }

    #[test]
    fn settings_follow_pipeline_config() {
        let config = PipelineConfig {
            channel_capacity: 3,
            ..PipelineConfig::default()
        };
        assert_eq!(PipelineSettings::from(&config).channel_capacity, 3);
        assert_eq!(
            PipelineSettings::default().channel_capacity,
            DEFAULT_CHANNEL_CAPACITY
        );
    }

    #[test]
    fn register_chains() {
        let host = PluginHost::install(Arc::new(TestHost::new())).unwrap();
        host.register("a", append_name("a"))
            .and_then(|h| h.register("b", append_name("b")))
            .unwrap();
        assert_eq!(host.names(), ["a", "b"]);
    }

    #[test]
    fn clones_share_the_registry() {
        let host = PluginHost::install(Arc::new(TestHost::new())).unwrap();
        let clone = host.clone();
        clone.register("a", append_name("a")).unwrap();
        assert!(host.lookup("a").is_some());
    }

    #[test]
    fn configure_seeds_plugin_options() {
        let context = Arc::new(TestHost::new());
        let host = PluginHost::install(context.clone()).unwrap();
        let config = PipekitConfig {
            plugin: json!({"a": {"append": "x"}, "b": false})
                .as_object()
                .cloned()
                .unwrap(),
            ..PipekitConfig::default()
        };

        assert_eq!(host.configure(&config).unwrap(), 0);
        assert_eq!(
            context.options().get(&["plugin", "a", "append"]),
            Some(json!("x"))
        );
        assert!(context.options().is_false(&["plugin", "b"]));
    }

    #[tokio::test]
    async fn build_with_applies_options_to_every_plugin() {
        let host = PluginHost::install(Arc::new(TestHost::new())).unwrap();
        host.register("a", append_name("a")).unwrap();
        host.register("b", append_name("b")).unwrap();

        let mut options = Options::new();
        options.insert("append".into(), json!("!"));
        let out = host
            .build_with(options)
            .collect(vec![fixture()])
            .await
            .unwrap();
        assert_eq!(out[0].text(), "Name:a!b!");
    }

    #[traced_test]
    #[tokio::test]
    async fn build_and_registration_are_logged() {
        let host = PluginHost::install(Arc::new(TestHost::new())).unwrap();
        host.register("a", append_name("a")).unwrap();
        host.build(["a", "missing"])
            .collect(vec![fixture()])
            .await
            .unwrap();

        assert!(logs_contain("plugin host installed"));
        assert!(logs_contain("registered plugin"));
        assert!(logs_contain("skipping unregistered plugin"));
        assert!(logs_contain("built pipeline"));
    }
}
