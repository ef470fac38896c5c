// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory process table for testing

use super::{ProcessEntry, ProcessTable, ProcessTableError};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Scripted process. `None` fields make the matching query fail.
#[derive(Debug, Clone, Default)]
pub struct FakeProcess {
    pub argv: Vec<String>,
    pub cpu: Option<f32>,
    pub mem: Option<f32>,
    pub elapsed: Option<u64>,
    pub stdout: Option<PathBuf>,
}

impl FakeProcess {
    /// Process with every query answering.
    pub fn new(argv: &[&str]) -> Self {
        Self {
            argv: argv.iter().map(|a| a.to_string()).collect(),
            cpu: Some(1.5),
            mem: Some(0.8),
            elapsed: Some(95),
            stdout: None,
        }
    }

    pub fn with_stdout(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdout = Some(path.into());
        self
    }
}

#[derive(Default)]
struct FakeTableState {
    processes: BTreeMap<u32, FakeProcess>,
    query_delay: Option<Duration>,
}

/// Fake process table; clones share state.
#[derive(Clone, Default)]
pub struct FakeProcessTable {
    inner: Arc<Mutex<FakeTableState>>,
}

impl FakeProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, pid: u32, process: FakeProcess) {
        self.inner.lock().processes.insert(pid, process);
    }

    pub fn remove(&self, pid: u32) {
        self.inner.lock().processes.remove(&pid);
    }

    /// Make per-process queries sleep, for timeout tests.
    pub fn set_query_delay(&self, delay: Duration) {
        self.inner.lock().query_delay = Some(delay);
    }

    fn query<T>(
        &self,
        pid: u32,
        what: &str,
        f: impl FnOnce(&FakeProcess) -> Option<T>,
    ) -> Result<T, ProcessTableError> {
        let (process, delay) = {
            let inner = self.inner.lock();
            (inner.processes.get(&pid).cloned(), inner.query_delay)
        };
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        let process = process.ok_or(ProcessTableError::NotFound(pid))?;
        f(&process).ok_or_else(|| ProcessTableError::Malformed {
            path: PathBuf::from(format!("/proc/{pid}/{what}")),
            reason: "scripted failure".into(),
        })
    }
}

impl ProcessTable for FakeProcessTable {
    fn list(&self) -> Result<Vec<ProcessEntry>, ProcessTableError> {
        Ok(self
            .inner
            .lock()
            .processes
            .iter()
            .filter(|(_, p)| !p.argv.is_empty())
            .map(|(pid, p)| ProcessEntry { pid: *pid, argv: p.argv.clone() })
            .collect())
    }

    fn cpu_percent(&self, pid: u32) -> Result<f32, ProcessTableError> {
        self.query(pid, "stat", |p| p.cpu)
    }

    fn mem_percent(&self, pid: u32) -> Result<f32, ProcessTableError> {
        self.query(pid, "status", |p| p.mem)
    }

    fn elapsed_secs(&self, pid: u32) -> Result<u64, ProcessTableError> {
        self.query(pid, "stat", |p| p.elapsed)
    }

    fn stdout_target(&self, pid: u32) -> Result<Option<PathBuf>, ProcessTableError> {
        self.query(pid, "fd/1", |p| Some(p.stdout.clone()))
    }
}
