// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status snapshot published by the collector and read by dashboards.

use crate::meta::TaskMeta;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One live runner process, optionally joined with its launch metadata.
///
/// Process fields that could not be queried in time are `None`. The metadata
/// fields (`name`, `started`, `max_turns`) are either all present or all
/// `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessObservation {
    pub pid: u32,
    /// CPU usage over the process lifetime, in percent.
    pub cpu: Option<f32>,
    /// Resident memory as a percentage of total memory.
    pub mem: Option<f32>,
    /// Elapsed time in `ps` `etime` layout.
    pub etime: Option<String>,
    pub cmd: String,
    /// Log file the process writes its stdout to.
    pub log: Option<PathBuf>,
    #[serde(default)]
    pub log_tail: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub started: Option<String>,
    #[serde(default)]
    pub max_turns: Option<u32>,
}

impl ProcessObservation {
    /// An observation with only the always-known fields set.
    pub fn new(pid: u32, cmd: impl Into<String>) -> Self {
        Self {
            pid,
            cpu: None,
            mem: None,
            etime: None,
            cmd: cmd.into(),
            log: None,
            log_tail: Vec::new(),
            name: None,
            started: None,
            max_turns: None,
        }
    }

    /// Copy the metadata fields in.
    pub fn merge_meta(&mut self, meta: TaskMeta) {
        self.name = Some(meta.name);
        self.started = Some(meta.started);
        self.max_turns = Some(meta.max_turns);
    }

    pub fn has_meta(&self) -> bool {
        self.name.is_some()
    }
}

/// Snapshot of every runner process on one host at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Local ISO-8601 time of collection.
    pub timestamp: String,
    pub running: bool,
    pub count: usize,
    pub processes: Vec<ProcessObservation>,
}

impl StatusSnapshot {
    /// Build a snapshot; `running` and `count` are derived from `processes`,
    /// which are ordered by pid.
    pub fn new(timestamp: String, mut processes: Vec<ProcessObservation>) -> Self {
        processes.sort_by_key(|p| p.pid);
        Self { timestamp, running: !processes.is_empty(), count: processes.len(), processes }
    }

    pub fn find_by_log(&self, log: &std::path::Path) -> Option<&ProcessObservation> {
        self.processes.iter().find(|p| p.log.as_deref() == Some(log))
    }

    pub fn find_by_pid(&self, pid: u32) -> Option<&ProcessObservation> {
        self.processes.iter().find(|p| p.pid == pid)
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
