// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task state derived from current facts.
//!
//! Nothing here is persisted: every read recomputes the state from the
//! latest snapshot, the task's metadata, and its log tail.

use crate::meta::TaskMeta;
use crate::snapshot::ProcessObservation;
use crate::time_fmt::parse_timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Metadata written, process not yet seen by a collection.
    Launched,
    /// A matching process was observed in the latest snapshot.
    Running,
    /// Running, but the recent log shows no variation.
    StuckSuspected,
    /// Metadata exists but no process was observed (finished, crashed, or killed).
    Vanished,
}

impl TaskState {
    /// Classify a task from what is currently known about it.
    ///
    /// Returns `None` when there is neither a process nor metadata.
    /// `snapshot_timestamp` decides between launched and vanished: a task
    /// started after the snapshot was taken cannot have been observed yet.
    pub fn classify(
        meta: Option<&TaskMeta>,
        observation: Option<&ProcessObservation>,
        stuck: bool,
        snapshot_timestamp: &str,
    ) -> Option<Self> {
        if observation.is_some() {
            return Some(if stuck { TaskState::StuckSuspected } else { TaskState::Running });
        }
        let meta = meta?;
        let started_after_snapshot = match (
            parse_timestamp(&meta.started),
            parse_timestamp(snapshot_timestamp),
        ) {
            (Some(started), Some(taken)) => started > taken,
            _ => false,
        };
        Some(if started_after_snapshot { TaskState::Launched } else { TaskState::Vanished })
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskState::Launched => "launched",
            TaskState::Running => "running",
            TaskState::StuckSuspected => "stuck?",
            TaskState::Vanished => "vanished",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
