// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration value object shared by the launcher, collector, and reader.
//!
//! Components never look at the environment; the CLI builds a [`Config`]
//! (TOML file plus flag overrides) and hands it to each component.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Hosts with this name (or `localhost`) use the local shell transport.
pub const LOCAL_HOST: &str = "local";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("invalid config {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("invalid runner_pattern `{pattern}`: {source}")]
    Pattern { pattern: String, source: regex::Error },

    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),

    #[error("`stuck_window` ({window}) must not exceed `log_tail_lines` ({lines})")]
    StuckWindow { window: usize, lines: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Target host: `local` or an ssh destination such as `user@10.0.0.5`.
    pub host: String,
    /// Command prefix that starts the agent runner.
    pub runner_command: String,
    /// Regex matched against full command lines to recognize runner processes.
    pub runner_pattern: String,
    /// Turn budget passed to the runner when the caller does not choose one.
    /// Deliberately far above the runner's own default, which long tasks exhaust.
    pub max_turns_default: u32,
    pub poll_interval_ms: u64,
    pub log_tail_lines: usize,
    /// Directory for generated log files on the target host (`~/` allowed).
    pub log_dir: String,
    /// Well-known snapshot location on the collecting host (`~/` allowed).
    pub snapshot_path: String,
    pub connect_timeout_ms: u64,
    pub command_timeout_ms: u64,
    pub query_timeout_ms: u64,
    pub replace_grace_ms: u64,
    pub stuck_window: usize,
    /// Directories prepended to `PATH` on the target host.
    pub path_prepend: Vec<String>,
    /// Private key passed to ssh with `-i`.
    pub identity_file: Option<PathBuf>,
    /// Hosts polled by `dlg status` when none are given explicitly.
    pub hosts: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: LOCAL_HOST.to_string(),
            runner_command: "claude --dangerously-skip-permissions".to_string(),
            runner_pattern: "claude.*(-p|--print)".to_string(),
            max_turns_default: 200,
            poll_interval_ms: 30_000,
            log_tail_lines: 5,
            log_dir: "~/.local/state/dlg/tasks".to_string(),
            snapshot_path: "~/.local/state/dlg/status.json".to_string(),
            connect_timeout_ms: 5_000,
            command_timeout_ms: 10_000,
            query_timeout_ms: 2_000,
            replace_grace_ms: 1_000,
            stuck_window: 5,
            path_prepend: Vec::new(),
            identity_file: None,
            hosts: Vec::new(),
        }
    }
}

impl Config {
    /// Load a TOML config file and validate it.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml(&text, path)
    }

    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)
            .map_err(|source| ConfigError::Parse { path: origin.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        regex::Regex::new(&self.runner_pattern).map_err(|source| ConfigError::Pattern {
            pattern: self.runner_pattern.clone(),
            source,
        })?;
        let nonzero: [(&'static str, u64); 8] = [
            ("max_turns_default", u64::from(self.max_turns_default)),
            ("poll_interval_ms", self.poll_interval_ms),
            ("log_tail_lines", self.log_tail_lines as u64),
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("command_timeout_ms", self.command_timeout_ms),
            ("query_timeout_ms", self.query_timeout_ms),
            ("replace_grace_ms", self.replace_grace_ms),
            ("stuck_window", self.stuck_window as u64),
        ];
        if let Some((name, _)) = nonzero.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::Zero(name));
        }
        // Snapshots carry `log_tail_lines`; a wider window could never match
        if self.stuck_window > self.log_tail_lines {
            return Err(ConfigError::StuckWindow {
                window: self.stuck_window,
                lines: self.log_tail_lines,
            });
        }
        Ok(())
    }

    pub fn is_local(&self) -> bool {
        is_local_host(&self.host)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn replace_grace(&self) -> Duration {
        Duration::from_millis(self.replace_grace_ms)
    }

    /// Same settings aimed at another host.
    pub fn for_host(&self, host: &str) -> Self {
        Self { host: host.to_string(), ..self.clone() }
    }
}

pub fn is_local_host(host: &str) -> bool {
    host == LOCAL_HOST || host == "localhost"
}

/// Expand a leading `~/` against the given home directory.
///
/// Only used for paths on the collecting host; remote paths are expanded by
/// the remote shell.
pub fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if path == "~" => home.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
