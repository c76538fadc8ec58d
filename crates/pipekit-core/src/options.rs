// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory hierarchical option store.

use std::sync::{PoisonError, RwLock};

use serde_json::{Map, Value};

use crate::traits::options::OptionStore;

/// An [`OptionStore`] backed by a JSON object behind a read-write lock.
#[derive(Debug, Default)]
pub struct OptionTree {
    root: RwLock<Map<String, Value>>,
}

impl OptionTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing JSON object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            root: RwLock::new(map),
        }
    }

    /// Copy of the whole tree.
    pub fn snapshot(&self) -> Value {
        Value::Object(self.root.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    /// Split a dotted key such as `plugin.lint.disable` into path segments.
    pub fn split_key(key: &str) -> Vec<&str> {
        key.split('.').filter(|s| !s.is_empty()).collect()
    }
}

impl OptionStore for OptionTree {
    fn get(&self, path: &[&str]) -> Option<Value> {
        let root = self.root.read().unwrap_or_else(PoisonError::into_inner);
        let (first, rest) = path.split_first()?;
        let mut current = root.get(*first)?;
        for segment in rest {
            current = current.as_object()?.get(*segment)?;
        }
        Some(current.clone())
    }

    fn set(&self, path: &[&str], value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut root = self.root.write().unwrap_or_else(PoisonError::into_inner);
        let mut current: &mut Map<String, Value> = &mut root;
        for segment in parents {
            let slot = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot {
                Value::Object(map) => map,
                _ => unreachable!("slot was just made an object"),
            };
        }

        match value {
            Value::Object(incoming) => match current.get_mut(*last) {
                Some(Value::Object(existing)) => existing.extend(incoming),
                _ => {
                    current.insert(last.to_string(), Value::Object(incoming));
                }
            },
            value => {
                current.insert(last.to_string(), value);
            }
        }
    }
}
