// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monitor view: one host's snapshot, optionally focused on a single task.

use crate::reader::SnapshotReader;
use dlg_adapters::{RemoteShell, ShellError};
use dlg_core::{
    absolute_path_expr, derive_metadata_path, is_stuck, ProcessObservation, StatusSnapshot,
    TaskMeta, TaskState,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const META_MARK: &str = "@@dlg-meta";
const TAIL_MARK: &str = "@@dlg-tail";

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error("{host}: unexpected task detail reply")]
    BadReply { host: String },
}

/// An observed runner process and its current state.
#[derive(Debug, Clone, Serialize)]
pub struct ObservedTask {
    pub state: TaskState,
    #[serde(flatten)]
    pub observation: ProcessObservation,
}

/// A specific task looked up by its log file.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDetail {
    pub log_file: PathBuf,
    /// `None` when neither a process nor metadata was found.
    pub state: Option<TaskState>,
    pub meta: Option<TaskMeta>,
    pub log_tail: Vec<String>,
}

/// What is known about one host right now. A host without a readable
/// snapshot still yields a view, with `error` set and no tasks.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorView {
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub tasks: Vec<ObservedTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<TaskDetail>,
}

pub struct Monitor<S: RemoteShell> {
    reader: SnapshotReader<S>,
    tail_lines: usize,
    stuck_window: usize,
}

impl<S: RemoteShell> Monitor<S> {
    pub fn new(reader: SnapshotReader<S>, tail_lines: usize, stuck_window: usize) -> Self {
        Self { reader, tail_lines, stuck_window }
    }

    /// Never fails: fetch and detail errors are carried in the view.
    pub async fn view(&self, log_file: Option<&str>) -> MonitorView {
        let host = self.reader.host().to_string();
        let (snapshot, mut error) = match self.reader.fetch().await {
            Ok(snapshot) => (Some(snapshot), None),
            Err(e) => {
                tracing::warn!(host = %host, error = %e, "no snapshot for monitor");
                (None, Some(e.to_string()))
            }
        };
        let tasks = snapshot
            .iter()
            .flat_map(|s| s.processes.iter())
            .map(|obs| ObservedTask {
                state: if is_stuck(&obs.log_tail, self.stuck_window) {
                    TaskState::StuckSuspected
                } else {
                    TaskState::Running
                },
                observation: obs.clone(),
            })
            .collect();

        let focus = match log_file {
            Some(log_file) => match self.detail(snapshot.as_ref(), log_file).await {
                Ok(detail) => Some(detail),
                Err(e) => {
                    tracing::warn!(host = %host, log_file, error = %e, "task detail failed");
                    if error.is_none() {
                        error = Some(e.to_string());
                    }
                    None
                }
            },
            None => None,
        };

        MonitorView { host, error, timestamp: snapshot.map(|s| s.timestamp), tasks, focus }
    }

    /// Lines fetched for a focused task; more than the stuck window so a
    /// few blank lines do not hide a repeating tail.
    fn focus_lines(&self) -> usize {
        self.tail_lines.max(self.stuck_window * 2)
    }

    async fn detail(
        &self,
        snapshot: Option<&StatusSnapshot>,
        log_file: &str,
    ) -> Result<TaskDetail, MonitorError> {
        let meta_file = derive_metadata_path(Path::new(log_file));
        let script = format!(
            "log={log}\nmeta={meta}\nprintf '%s\\n%s\\n' \"$log\" {META_MARK}\n\
             [ -f \"$meta\" ] && cat \"$meta\"\n\
             printf '\\n%s\\n' {TAIL_MARK}\n\
             [ -f \"$log\" ] && tail -n {lines} \"$log\"\n\
             exit 0\n",
            log = absolute_path_expr(log_file),
            meta = absolute_path_expr(&meta_file.to_string_lossy()),
            lines = self.focus_lines(),
        );
        let shell = self.reader.shell();
        let output = shell.run_checked(&script, None, self.reader.timeout()).await?;
        let reply = parse_task_reply(&output.stdout)
            .ok_or_else(|| MonitorError::BadReply { host: shell.host().to_string() })?;

        let Some(snapshot) = snapshot else {
            // Nothing collected yet: a task with metadata cannot have been seen.
            let state = reply.meta.as_ref().map(|_| TaskState::Launched);
            return Ok(TaskDetail {
                log_file: reply.log_file,
                state,
                meta: reply.meta,
                log_tail: reply.tail,
            });
        };

        let observed = snapshot.find_by_log(&reply.log_file).or_else(|| {
            // stdout lookup may have failed during collection
            let pid = reply.meta.as_ref()?.pid;
            snapshot.find_by_pid(pid).filter(|obs| obs.log.is_none())
        });
        let tail = if reply.tail.is_empty() {
            observed.map(|o| o.log_tail.clone()).unwrap_or_default()
        } else {
            reply.tail
        };
        let state = TaskState::classify(
            reply.meta.as_ref(),
            observed,
            is_stuck(&tail, self.stuck_window),
            &snapshot.timestamp,
        );

        Ok(TaskDetail { log_file: reply.log_file, state, meta: reply.meta, log_tail: tail })
    }
}

struct TaskReply {
    log_file: PathBuf,
    meta: Option<TaskMeta>,
    tail: Vec<String>,
}

/// Split the task reply into log path, metadata, and tail sections.
fn parse_task_reply(stdout: &str) -> Option<TaskReply> {
    let (head, tail) = stdout.split_once(&format!("\n{TAIL_MARK}\n"))?;
    let (log_file, meta_text) = head.split_once(&format!("\n{META_MARK}\n"))?;
    let meta_text = meta_text.trim();
    let meta = if meta_text.is_empty() {
        None
    } else {
        match TaskMeta::parse(meta_text) {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::warn!(log_file, error = %e, "ignoring corrupt task metadata");
                None
            }
        }
    };
    Some(TaskReply {
        log_file: PathBuf::from(log_file),
        meta,
        tail: tail.lines().map(str::to_string).collect(),
    })
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
