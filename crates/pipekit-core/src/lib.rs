// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Pipekit pipeline composer.
//!
//! This crate provides the error taxonomy, the record type, the
//! [`Runnable`] stage trait with its [`Unit`] handle and combinators, and
//! the capability traits a host implements to install a plugin host.

pub mod error;
pub mod implementation;
pub mod options;
pub mod stage;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PipekitError;
pub use implementation::{Factory, Implementation};
pub use options::OptionTree;
pub use stage::{Chain, DEFAULT_CHANNEL_CAPACITY, MapStage, PassThrough, Unit};
pub use types::{Options, Record};

pub use traits::{
    ConfigHandler, HostContext, InstallSlot, OptionStore, PluginLoader, RecordReceiver,
    RecordSender, Runnable,
};
