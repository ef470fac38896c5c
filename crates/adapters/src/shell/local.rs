// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport for tasks on the machine running `dlg`.

use super::{run_command, with_path_prepend, RemoteShell, ShellError, ShellOutput};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;

/// Runs scripts with the local `sh`.
#[derive(Clone, Debug, Default)]
pub struct LocalShell {
    path_prepend: Vec<String>,
}

impl LocalShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path_prepend(mut self, path_prepend: Vec<String>) -> Self {
        self.path_prepend = path_prepend;
        self
    }
}

#[async_trait]
impl RemoteShell for LocalShell {
    fn host(&self) -> &str {
        dlg_core::LOCAL_HOST
    }

    async fn run(
        &self,
        script: &str,
        stdin: Option<&[u8]>,
        timeout: Duration,
    ) -> Result<ShellOutput, ShellError> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(with_path_prepend(script, &self.path_prepend));
        run_command(cmd, "sh", self.host(), stdin, timeout).await
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
