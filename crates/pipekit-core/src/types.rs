// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by stages, the registry, and the composer.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Options passed to plugin factories: a flat JSON object.
pub type Options = Map<String, Value>;

/// Top-level option namespace under which per-plugin options live.
pub const PLUGIN_NAMESPACE: &str = "plugin";

/// Key inside a plugin's option table that disables the plugin when `true`.
pub const DISABLE_KEY: &str = "disable";

/// A single record flowing through a pipeline.
///
/// The composer never looks inside records; stages are free to rewrite
/// the contents or annotate `data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier of the record, typically a source path.
    pub path: String,
    /// Raw payload.
    pub contents: Vec<u8>,
    /// Free-form annotations attached by stages.
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Record {
    /// Create a record from a path and textual contents.
    pub fn new(path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
            data: Map::new(),
        }
    }

    /// The contents decoded as UTF-8, lossily.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.contents)
    }

    /// Append text to the contents.
    pub fn push_str(&mut self, s: &str) {
        self.contents.extend_from_slice(s.as_bytes());
    }

    /// Set an annotation.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    /// Read an annotation.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// Option path of a plugin's option table: `["plugin", name]`.
pub fn plugin_option_path(name: &str) -> [&str; 2] {
    [PLUGIN_NAMESPACE, name]
}

/// Option path of a plugin's nested disable flag: `["plugin", name, "disable"]`.
pub fn plugin_disable_path(name: &str) -> [&str; 3] {
    [PLUGIN_NAMESPACE, name, DISABLE_KEY]
}

/// Shallow merge: keys in `overrides` win over keys in `base`.
pub fn merge_options(base: &Options, overrides: &Options) -> Options {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_text_and_append() {
        let mut record = Record::new("fixtures/foo.txt", "Name:");
        record.push_str("a");
        record.push_str("b");
        assert_eq!(record.text(), "Name:ab");
    }

    #[test]
    fn record_annotations() {
        let mut record = Record::default();
        record.set("foo", "bar");
        assert_eq!(record.get("foo"), Some(&json!("bar")));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn merge_options_override_wins() {
        let base = json!({"foo": "bar", "keep": 1});
        let overrides = json!({"foo": "baz"});
        let merged = merge_options(
            base.as_object().unwrap(),
            overrides.as_object().unwrap(),
        );
        assert_eq!(Value::Object(merged), json!({"foo": "baz", "keep": 1}));
    }

    #[test]
    fn plugin_paths() {
        assert_eq!(plugin_option_path("lint"), ["plugin", "lint"]);
        assert_eq!(plugin_disable_path("lint"), ["plugin", "lint", "disable"]);
    }
}
