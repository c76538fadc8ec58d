// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative configuration for the Pipekit composer.
//!
//! Loads `pipekit.toml` from the usual hierarchy with environment
//! overrides, validates it, and renders failures as miette diagnostics.
//! The resulting [`PipekitConfig`] carries pipeline settings, per-plugin
//! option tables, and declarative plugin definitions.
//!
//! # Usage
//!
//! ```no_run
//! use pipekit_config::{init_tracing, load_and_validate};
//!
//! let config = load_and_validate().expect("config errors");
//! init_tracing(config.pipeline.log_level);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod logging;
pub mod model;
pub mod validation;

use std::path::Path;

use tracing::debug;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use logging::init_tracing;
pub use model::{LogLevel, PipekitConfig, PipelineConfig};

/// Load configuration from the standard hierarchy and validate it.
pub fn load_and_validate() -> Result<PipekitConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load and validate configuration from an inline TOML string.
pub fn load_and_validate_str(toml_content: &str) -> Result<PipekitConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Load and validate configuration from a single file.
pub fn load_and_validate_path(path: &Path) -> Result<PipekitConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        std::fs::read_to_string(path)
            .map(|content| vec![(path.display().to_string(), content)])
            .unwrap_or_default()
    })
}

fn finish(
    loaded: Result<PipekitConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<PipekitConfig, Vec<ConfigError>> {
    match loaded {
        Ok(mut config) => {
            let order = loader::declared_keys(&sources(), "plugins");
            loader::restore_order(&mut config.plugins, &order);
            validation::validate_config(&config)?;
            debug!(
                plugin_tables = config.plugin.len(),
                definitions = config.plugins.len(),
                "configuration loaded"
            );
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Read every config file that exists, for span resolution in diagnostics.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = vec![std::path::PathBuf::from(loader::SYSTEM_CONFIG)];
    candidates.extend(loader::user_config_path());
    candidates.push(
        std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG))
            .unwrap_or_else(|_| loader::LOCAL_CONFIG.into()),
    );

    candidates
        .into_iter()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
