// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.
//!
//! Nothing else in the workspace reads the environment; components receive
//! a [`Config`] built here.

use crate::exit_error::ExitError;
use dlg_core::{Config, ConfigError};
use std::path::{Path, PathBuf};

/// Where the config file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    /// Explicitly requested files must exist; the default location may not.
    pub required: bool,
}

/// Resolve the config file: `--config` > `DLG_CONFIG` >
/// `$XDG_CONFIG_HOME/dlg/config.toml` > `~/.config/dlg/config.toml`.
pub fn config_source(explicit: Option<&Path>) -> Option<ConfigSource> {
    resolve_config_source(
        explicit,
        std::env::var("DLG_CONFIG").ok(),
        std::env::var("XDG_CONFIG_HOME").ok(),
        dirs::home_dir(),
    )
}

pub(crate) fn resolve_config_source(
    explicit: Option<&Path>,
    dlg_config: Option<String>,
    xdg_config_home: Option<String>,
    home: Option<PathBuf>,
) -> Option<ConfigSource> {
    if let Some(path) = explicit {
        return Some(ConfigSource { path: path.to_path_buf(), required: true });
    }
    if let Some(path) = dlg_config.filter(|s| !s.is_empty()) {
        return Some(ConfigSource { path: PathBuf::from(path), required: true });
    }
    let base = xdg_config_home
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|h| h.join(".config")))?;
    Some(ConfigSource { path: base.join("dlg").join("config.toml"), required: false })
}

/// Load and validate the config. A missing default file means defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ExitError> {
    let config = match config_source(explicit) {
        Some(source) if source.required || source.path.exists() => {
            tracing::debug!(path = %source.path.display(), "loading config");
            Config::from_file(&source.path).map_err(config_error)?
        }
        _ => Config::default(),
    };
    config.validate().map_err(config_error)?;
    Ok(config)
}

fn config_error(e: ConfigError) -> ExitError {
    ExitError::usage(e.to_string())
}

/// Log filter directive from `DLG_LOG`.
pub fn log_filter() -> Option<String> {
    std::env::var("DLG_LOG").ok().filter(|s| !s.is_empty())
}

pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
