// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote snapshot reader.
//!
//! Readers only ever `cat` the published snapshot; they never enumerate
//! processes themselves.

use dlg_adapters::{RemoteShell, ShellError};
use dlg_core::{remote_path_expr, Config, StatusSnapshot};
use futures_util::future::join_all;
use std::time::Duration;
use thiserror::Error;

/// Exit status the fetch script uses for "no snapshot published yet".
const NO_SNAPSHOT_EXIT: i32 = 3;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error("no snapshot at {path} (is the collector scheduled?)")]
    NoSnapshot { host: String, path: String },

    #[error("invalid snapshot: {source}")]
    Decode { host: String, source: serde_json::Error },
}

#[derive(Debug, Clone)]
pub struct SnapshotReader<S: RemoteShell> {
    shell: S,
    path: String,
    timeout: Duration,
}

impl<S: RemoteShell> SnapshotReader<S> {
    pub fn new(shell: S, config: &Config) -> Self {
        Self { shell, path: config.snapshot_path.clone(), timeout: config.command_timeout() }
    }

    pub fn host(&self) -> &str {
        self.shell.host()
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn fetch(&self) -> Result<StatusSnapshot, FetchError> {
        let script = format!(
            "f={}\n[ -f \"$f\" ] || exit {NO_SNAPSHOT_EXIT}\ncat \"$f\"\n",
            remote_path_expr(&self.path)
        );
        let output = self.shell.run(&script, None, self.timeout).await?;
        match output.code {
            0 => serde_json::from_str(&output.stdout).map_err(|source| FetchError::Decode {
                host: self.host().to_string(),
                source,
            }),
            NO_SNAPSHOT_EXIT => Err(FetchError::NoSnapshot {
                host: self.host().to_string(),
                path: self.path.clone(),
            }),
            code => Err(ShellError::Failed {
                host: self.host().to_string(),
                code,
                stderr: output.stderr.trim().to_string(),
            }
            .into()),
        }
    }
}

/// Outcome of polling one host.
#[derive(Debug)]
pub struct HostStatus {
    pub host: String,
    pub result: Result<StatusSnapshot, FetchError>,
}

/// Poll every host concurrently. Results keep the input order and a failing
/// host never affects the others.
pub async fn fetch_all<S: RemoteShell>(readers: &[SnapshotReader<S>]) -> Vec<HostStatus> {
    join_all(readers.iter().map(|reader| async move {
        let result = reader.fetch().await;
        if let Err(ref e) = result {
            tracing::warn!(host = %reader.host(), error = %e, "status fetch failed");
        }
        HostStatus { host: reader.host().to_string(), result }
    }))
    .await
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
