// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake shell transport for testing

use super::{RemoteShell, ShellError, ShellOutput};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Recorded script invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCall {
    pub script: String,
    pub stdin: Option<String>,
}

/// Scripted reply for the next call
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Output { code: i32, stdout: String, stderr: String },
    Unreachable,
    Timeout,
}

struct FakeShellState {
    calls: Vec<ShellCall>,
    responses: VecDeque<FakeResponse>,
}

/// Fake transport that records scripts and replays queued responses.
///
/// With the queue empty every call succeeds with no output.
#[derive(Clone)]
pub struct FakeShell {
    host: String,
    inner: Arc<Mutex<FakeShellState>>,
}

impl Default for FakeShell {
    fn default() -> Self {
        Self::new("fake-host")
    }
}

impl FakeShell {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            inner: Arc::new(Mutex::new(FakeShellState {
                calls: Vec::new(),
                responses: VecDeque::new(),
            })),
        }
    }

    pub fn push(&self, response: FakeResponse) {
        self.inner.lock().responses.push_back(response);
    }

    pub fn push_stdout(&self, stdout: impl Into<String>) {
        self.push(FakeResponse::Output { code: 0, stdout: stdout.into(), stderr: String::new() });
    }

    pub fn push_failure(&self, code: i32, stderr: impl Into<String>) {
        self.push(FakeResponse::Output { code, stdout: String::new(), stderr: stderr.into() });
    }

    pub fn push_unreachable(&self) {
        self.push(FakeResponse::Unreachable);
    }

    pub fn push_timeout(&self) {
        self.push(FakeResponse::Timeout);
    }

    pub fn calls(&self) -> Vec<ShellCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl RemoteShell for FakeShell {
    fn host(&self) -> &str {
        &self.host
    }

    async fn run(
        &self,
        script: &str,
        stdin: Option<&[u8]>,
        timeout: Duration,
    ) -> Result<ShellOutput, ShellError> {
        let response = {
            let mut inner = self.inner.lock();
            inner.calls.push(ShellCall {
                script: script.to_string(),
                stdin: stdin.map(|b| String::from_utf8_lossy(b).into_owned()),
            });
            inner.responses.pop_front()
        };
        match response {
            None => Ok(ShellOutput::default()),
            Some(FakeResponse::Output { code, stdout, stderr }) => {
                Ok(ShellOutput { code, stdout, stderr })
            }
            Some(FakeResponse::Unreachable) => Err(ShellError::Connection {
                host: self.host.clone(),
                message: "Connection refused".to_string(),
            }),
            Some(FakeResponse::Timeout) => {
                Err(ShellError::Timeout { host: self.host.clone(), timeout })
            }
        }
    }
}
