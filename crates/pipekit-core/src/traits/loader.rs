// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning a declarative resource path into a plugin implementation.

use crate::error::PipekitError;
use crate::implementation::Implementation;

/// Host-supplied resolver for plugin paths named in configuration.
///
/// The composer never loads code itself; it asks the loader for whatever
/// implementation the host has bound to `path`.
pub trait PluginLoader: Send + Sync {
    fn load(&self, path: &str) -> Result<Implementation, PipekitError>;
}
