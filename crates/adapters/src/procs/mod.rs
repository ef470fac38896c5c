// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host process table queries used by the collector.
//!
//! Each per-process query is independent: a failure in one leaves the
//! corresponding field empty without affecting the others.

mod procfs;

pub use procfs::ProcfsTable;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessTableError {
    #[error("process {0} not found")]
    NotFound(u32),

    #[error("cannot read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("malformed {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// A running process and its argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub argv: Vec<String>,
}

impl ProcessEntry {
    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}

/// Synchronous view of the host's process table.
///
/// Calls may block on the filesystem; async callers run them on the
/// blocking pool.
pub trait ProcessTable: Send + Sync + 'static {
    /// All processes with a non-empty command line.
    fn list(&self) -> Result<Vec<ProcessEntry>, ProcessTableError>;

    /// Lifetime-average CPU usage, in percent of one core.
    fn cpu_percent(&self, pid: u32) -> Result<f32, ProcessTableError>;

    /// Resident memory as a percent of total memory.
    fn mem_percent(&self, pid: u32) -> Result<f32, ProcessTableError>;

    /// Seconds since the process started.
    fn elapsed_secs(&self, pid: u32) -> Result<u64, ProcessTableError>;

    /// File the process's stdout points at, if it is a regular file.
    fn stdout_target(&self, pid: u32) -> Result<Option<PathBuf>, ProcessTableError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProcess, FakeProcessTable};
