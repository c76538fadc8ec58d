// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hierarchical option lookup consumed by the registry and resolver.

use serde_json::Value;

/// Key-path option store owned by the host.
///
/// Paths are ordered segments such as `["plugin", "lint", "disable"]`.
/// Implementations use interior mutability so one store can be shared
/// between the host, the registry, and in-flight builds.
pub trait OptionStore: Send + Sync {
    /// Value at `path`, if any.
    fn get(&self, path: &[&str]) -> Option<Value>;

    /// Write `value` at `path`, creating intermediate objects.
    ///
    /// When both the existing value and `value` are objects they are
    /// merged shallowly, new keys winning.
    fn set(&self, path: &[&str], value: Value);

    /// True when the value at `path` is the boolean `true`.
    fn is_true(&self, path: &[&str]) -> bool {
        matches!(self.get(path), Some(Value::Bool(true)))
    }

    /// True when the value at `path` is the boolean `false`.
    fn is_false(&self, path: &[&str]) -> bool {
        matches!(self.get(path), Some(Value::Bool(false)))
    }

    /// Set `path` to `true`.
    fn enable(&self, path: &[&str]) {
        self.set(path, Value::Bool(true));
    }

    /// Set `path` to `false`.
    fn disable(&self, path: &[&str]) {
        self.set(path, Value::Bool(false));
    }
}
