// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport for tasks on other machines, via the `ssh` client.

use super::{run_command, with_path_prepend, RemoteShell, ShellError, ShellOutput};
use async_trait::async_trait;
use dlg_core::{shell_quote, Config};
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

/// ssh reserves this exit status for its own failures.
const SSH_ERROR_EXIT: i32 = 255;

/// Runs scripts on a remote host through a non-interactive ssh session.
#[derive(Clone, Debug)]
pub struct SshShell {
    destination: String,
    connect_timeout: Duration,
    identity_file: Option<PathBuf>,
    path_prepend: Vec<String>,
}

impl SshShell {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            connect_timeout: Duration::from_secs(5),
            identity_file: None,
            path_prepend: Vec::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            destination: config.host.clone(),
            connect_timeout: config.connect_timeout(),
            identity_file: config.identity_file.clone(),
            path_prepend: config.path_prepend.clone(),
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_identity_file(mut self, path: PathBuf) -> Self {
        self.identity_file = Some(path);
        self
    }

    /// Arguments passed to the `ssh` binary for `script`.
    pub fn args(&self, script: &str) -> Vec<String> {
        // ConnectTimeout takes whole seconds
        let connect_secs = self.connect_timeout.as_millis().div_ceil(1000).max(1);
        let mut args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", connect_secs),
            "-o".to_string(),
            "StrictHostKeyChecking=accept-new".to_string(),
        ];
        if let Some(ref identity) = self.identity_file {
            args.push("-i".to_string());
            args.push(identity.to_string_lossy().into_owned());
        }
        args.push(self.destination.clone());
        args.push("--".to_string());
        // The remote login shell re-parses this string, so the script travels
        // as one quoted word for `sh -c`.
        args.push(format!("sh -c {}", shell_quote(&with_path_prepend(script, &self.path_prepend))));
        args
    }
}

#[async_trait]
impl RemoteShell for SshShell {
    fn host(&self) -> &str {
        &self.destination
    }

    async fn run(
        &self,
        script: &str,
        stdin: Option<&[u8]>,
        timeout: Duration,
    ) -> Result<ShellOutput, ShellError> {
        let mut cmd = Command::new("ssh");
        cmd.args(self.args(script));
        let output = run_command(cmd, "ssh", &self.destination, stdin, timeout).await?;
        if output.code == SSH_ERROR_EXIT {
            tracing::warn!(host = %self.destination, stderr = %output.stderr.trim(), "ssh connection failed");
            return Err(ShellError::Connection {
                host: self.destination.clone(),
                message: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}

#[cfg(test)]
#[path = "ssh_tests.rs"]
mod tests;
