// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small demo stages and factories for composing test pipelines.

use pipekit_core::{Factory, PipekitError, Record, Unit};
use serde_json::Value;

/// A factory whose stage appends `name` to each record's contents,
/// followed by the `append` option when it is a string.
pub fn append_name(name: &str) -> Factory {
    let name = name.to_string();
    Factory::new(move |options, input| {
        let suffix = options
            .get("append")
            .and_then(Value::as_str)
            .map(str::to_string);
        let name = name.clone();
        input.pipe(Unit::map(name.clone(), move |mut record: Record| {
            record.push_str(&name);
            if let Some(suffix) = &suffix {
                record.push_str(suffix);
            }
            Ok(record)
        }))
    })
}

/// A stage that fails on the first record it sees.
pub fn failing(name: &str, message: &str) -> Unit {
    let stage = name.to_string();
    let message = message.to_string();
    Unit::map(name, move |_: Record| {
        Err(PipekitError::stage_fault(stage.clone(), message.clone()))
    })
}

/// A stage storing `value` under `key` in each record's data.
pub fn set_field(key: &str, value: impl Into<Value>) -> Unit {
    let key = key.to_string();
    let value = value.into();
    Unit::map(format!("set-{key}"), move |mut record: Record| {
        record.set(key.clone(), value.clone());
        Ok(record)
    })
}

/// A factory that builds on the unit it is given and records that
/// unit's name under `input` in each record's data.
pub fn tag_via_input() -> Factory {
    Factory::new(|_, input| {
        let input_name = input.name().to_string();
        input.pipe(set_field("input", input_name))
    })
}
