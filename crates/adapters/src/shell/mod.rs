// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell transports for running scripts on a task host.
//!
//! Every call carries an explicit timeout; nothing here waits unbounded.

mod local;
mod ssh;

pub use local::LocalShell;
pub use ssh::SshShell;

use async_trait::async_trait;
use dlg_core::Config;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Errors from shell transports
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("cannot reach {host}: {message}")]
    Connection { host: String, message: String },

    #[error("{host}: command timed out after {}ms", timeout.as_millis())]
    Timeout { host: String, timeout: Duration },

    #[error("failed to run {program}: {source}")]
    Spawn { program: String, source: std::io::Error },

    #[error("{host}: command exited with status {code}: {stderr}")]
    Failed { host: String, code: i32, stderr: String },
}

impl ShellError {
    /// Whether the host itself could not be reached in time.
    pub fn is_connection(&self) -> bool {
        matches!(self, ShellError::Connection { .. } | ShellError::Timeout { .. })
    }
}

/// Captured result of a script run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellOutput {
    /// Exit code, or -1 when the shell was killed by a signal.
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs POSIX `sh` scripts on one host.
#[async_trait]
pub trait RemoteShell: Clone + Send + Sync + 'static {
    /// Host label used in logs and errors.
    fn host(&self) -> &str;

    /// Run `script` under `sh -c`, feeding `stdin` if given.
    ///
    /// A non-zero exit is returned as output, not as an error; transport
    /// failures and timeouts are errors.
    async fn run(
        &self,
        script: &str,
        stdin: Option<&[u8]>,
        timeout: Duration,
    ) -> Result<ShellOutput, ShellError>;

    /// Like [`RemoteShell::run`], but a non-zero exit is [`ShellError::Failed`].
    async fn run_checked(
        &self,
        script: &str,
        stdin: Option<&[u8]>,
        timeout: Duration,
    ) -> Result<ShellOutput, ShellError> {
        let output = self.run(script, stdin, timeout).await?;
        if output.success() {
            Ok(output)
        } else {
            Err(ShellError::Failed {
                host: self.host().to_string(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }
}

/// Picks the transport for a configured host: `local` runs `sh` directly,
/// anything else goes over ssh.
#[derive(Clone, Debug)]
pub enum ShellRouter {
    Local(LocalShell),
    Ssh(SshShell),
}

impl ShellRouter {
    pub fn for_config(config: &Config) -> Self {
        if config.is_local() {
            ShellRouter::Local(LocalShell::new().with_path_prepend(config.path_prepend.clone()))
        } else {
            ShellRouter::Ssh(SshShell::from_config(config))
        }
    }
}

#[async_trait]
impl RemoteShell for ShellRouter {
    fn host(&self) -> &str {
        match self {
            ShellRouter::Local(s) => s.host(),
            ShellRouter::Ssh(s) => s.host(),
        }
    }

    async fn run(
        &self,
        script: &str,
        stdin: Option<&[u8]>,
        timeout: Duration,
    ) -> Result<ShellOutput, ShellError> {
        match self {
            ShellRouter::Local(s) => s.run(script, stdin, timeout).await,
            ShellRouter::Ssh(s) => s.run(script, stdin, timeout).await,
        }
    }
}

/// Prefix a script with `PATH` additions for the target host.
pub(crate) fn with_path_prepend(script: &str, path_prepend: &[String]) -> String {
    if path_prepend.is_empty() {
        return script.to_string();
    }
    let dirs: Vec<String> =
        path_prepend.iter().map(|p| dlg_core::remote_path_expr(p)).collect();
    format!("PATH={}:\"$PATH\"; export PATH\n{}", dirs.join(":"), script)
}

/// Spawn `cmd`, feed stdin, and collect output within `timeout`.
///
/// The child is killed if the timeout elapses first. Processes the script
/// backgrounds with their own redirections are not affected.
pub(crate) async fn run_command(
    mut cmd: Command,
    program: &str,
    host: &str,
    stdin: Option<&[u8]>,
    timeout: Duration,
) -> Result<ShellOutput, ShellError> {
    cmd.stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .map_err(|source| ShellError::Spawn { program: program.to_string(), source })?;
    let input = stdin.map(<[u8]>::to_vec);
    let pipe = child.stdin.take();

    let exchange = async move {
        if let (Some(mut pipe), Some(input)) = (pipe, input) {
            // A script that exits without reading stdin closes the pipe early.
            if let Err(e) = pipe.write_all(&input).await {
                tracing::debug!(error = %e, "stdin closed before input was written");
            }
            drop(pipe);
        }
        child.wait_with_output().await
    };

    match tokio::time::timeout(timeout, exchange).await {
        Ok(Ok(output)) => Ok(ShellOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }),
        Ok(Err(source)) => Err(ShellError::Spawn { program: program.to_string(), source }),
        Err(_) => Err(ShellError::Timeout { host: host.to_string(), timeout }),
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeResponse, FakeShell, ShellCall};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
