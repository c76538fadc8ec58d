// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./pipekit.toml` > `~/.config/pipekit/pipekit.toml` >
//! `/etc/pipekit/pipekit.toml`, with `PIPEKIT_PIPELINE_*` environment
//! overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use serde_json::{Map, Value};

use crate::model::PipekitConfig;

pub(crate) const LOCAL_CONFIG: &str = "pipekit.toml";
pub(crate) const SYSTEM_CONFIG: &str = "/etc/pipekit/pipekit.toml";

/// Path of the per-user config file, if the platform has a config dir.
pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pipekit").join(LOCAL_CONFIG))
}

/// Build the layered Figment without extracting it.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/pipekit/pipekit.toml`
/// 3. `~/.config/pipekit/pipekit.toml`
/// 4. `./pipekit.toml`
/// 5. `PIPEKIT_PIPELINE_*` environment variables
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(PipekitConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment.merge(Toml::file(LOCAL_CONFIG)).merge(env_provider())
}

/// Load configuration from the standard hierarchy.
pub fn load_config() -> Result<PipekitConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PipekitConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PipekitConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PipekitConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PipekitConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Environment overrides for the `[pipeline]` section.
///
/// Only `PIPEKIT_PIPELINE_*` is honoured; plugin tables are keyed by
/// plugin names that cannot be recovered from an upper-cased variable.
fn env_provider() -> Env {
    Env::prefixed("PIPEKIT_")
        .filter(|key| key.as_str().to_ascii_lowercase().starts_with("pipeline_"))
        .map(|key| {
            key.as_str()
                .to_ascii_lowercase()
                .replacen("pipeline_", "pipeline.", 1)
                .into()
        })
}

/// Keys of `[section]` in the order the sources declare them.
///
/// Figment merges tables into sorted maps, so the declared order is read
/// back from the raw TOML. Sources are scanned in layering order and each
/// key is listed at its first appearance. Unparsable sources are skipped;
/// extraction reports them.
pub fn declared_keys(sources: &[(String, String)], section: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for (_, content) in sources {
        let Ok(document) = toml::from_str::<toml::Table>(content) else {
            continue;
        };
        if let Some(toml::Value::Table(entries)) = document.get(section) {
            for key in entries.keys() {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
    }
    keys
}

/// Reorder `map` so `order` comes first; keys missing from it follow.
pub fn restore_order(map: &mut Map<String, Value>, order: &[String]) {
    let mut rest = std::mem::take(map);
    for key in order {
        if let Some(value) = rest.shift_remove(key) {
            map.insert(key.clone(), value);
        }
    }
    map.extend(rest);
}
