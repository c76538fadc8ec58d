// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits at the seams between the composer, its stages, and the host.

pub mod host;
pub mod loader;
pub mod options;
pub mod runnable;

pub use host::{ConfigHandler, HostContext, InstallSlot};
pub use loader::PluginLoader;
pub use options::OptionStore;
pub use runnable::{RecordReceiver, RecordSender, Runnable};
