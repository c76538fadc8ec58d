// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! What a plugin name can be bound to.

use std::fmt;
use std::sync::Arc;

use crate::stage::Unit;
use crate::types::Options;

/// A function producing a stage from options and a fresh input unit.
///
/// The input unit is an inert pass-through the factory may build on
/// (`input.pipe(stage)`) or ignore.
#[derive(Clone)]
pub struct Factory(Arc<dyn Fn(&Options, Unit) -> Unit + Send + Sync>);

impl Factory {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Options, Unit) -> Unit + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Call the factory.
    pub fn invoke(&self, options: &Options, input: Unit) -> Unit {
        (self.0)(options, input)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Factory(..)")
    }
}

/// The implementation bound to a registered plugin name.
#[derive(Clone, Debug, Default)]
pub enum Implementation {
    /// Invoked with the effective options on every build.
    Factory(Factory),
    /// A ready-made stage, used verbatim.
    Unit(Unit),
    /// Another plugin name, resolved transitively.
    Alias(String),
    /// No implementation; the plugin contributes nothing to a pipeline.
    #[default]
    Empty,
}

impl Implementation {
    /// Wrap a closure as a factory implementation.
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&Options, Unit) -> Unit + Send + Sync + 'static,
    {
        Implementation::Factory(Factory::new(f))
    }

    pub fn alias(name: impl Into<String>) -> Self {
        Implementation::Alias(name.into())
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Implementation::Factory(_) => "factory",
            Implementation::Unit(_) => "unit",
            Implementation::Alias(_) => "alias",
            Implementation::Empty => "empty",
        }
    }
}

impl From<Factory> for Implementation {
    fn from(factory: Factory) -> Self {
        Implementation::Factory(factory)
    }
}

impl From<Unit> for Implementation {
    fn from(unit: Unit) -> Self {
        Implementation::Unit(unit)
    }
}

impl From<&str> for Implementation {
    fn from(name: &str) -> Self {
        Implementation::Alias(name.to_string())
    }
}

impl From<String> for Implementation {
    fn from(name: String) -> Self {
        Implementation::Alias(name)
    }
}

impl<T: Into<Implementation>> From<Option<T>> for Implementation {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
