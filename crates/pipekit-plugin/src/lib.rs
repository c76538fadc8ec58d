// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named plugins composed into streaming pipelines.
//!
//! A [`PluginHost`] is installed into a host context that provides an
//! option store. Plugins are registered under names and later composed,
//! by name or directly, into a [`Pipeline`]: an inert pass-through stage
//! followed by each resolved plugin, joined by bounded channels.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use pipekit_core::{HostContext, Unit};
//! # use pipekit_plugin::PluginHost;
//! # fn demo(context: Arc<dyn HostContext>, lint: Unit) -> Result<(), pipekit_core::PipekitError> {
//! let host = PluginHost::install(context)?;
//! host.register("lint", lint)?;
//! let pipeline = host.build(["lint"]);
//! # Ok(())
//! # }
//! ```

pub mod autoload;
pub mod host;
pub mod pipeline;
pub mod reference;
pub mod registry;
pub mod resolver;

pub use autoload::{
    PLUGINS_CONFIG_KEY, PluginDefinition, StaticLoader, apply_definitions, base_name,
    definitions_from_map, definitions_from_value,
};
pub use host::{PipelineSettings, PluginHost};
pub use pipeline::Pipeline;
pub use reference::{Plan, Reference, Request, normalize};
pub use registry::{PluginEntry, PluginRegistry};
pub use resolver::{Resolver, is_disabled};
