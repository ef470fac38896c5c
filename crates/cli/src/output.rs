// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text and JSON rendering for command results.

use crate::color;
use clap::ValueEnum;
use dlg_core::{is_stuck, ProcessObservation, StatusSnapshot, TaskState};
use dlg_engine::{HostStatus, LaunchOutcome, MonitorView, TaskDetail};
use serde::Serialize;
use std::fmt::Write;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const CMD_PREVIEW: usize = 60;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn percent(value: Option<f32>) -> String {
    value.map(|v| format!("{v:.1}%")).unwrap_or_else(|| "-".to_string())
}

/// State label padded to `width` before coloring so columns line up.
fn state_label(state: TaskState, width: usize) -> String {
    let text = format!("{:<width$}", state.label());
    match state {
        TaskState::StuckSuspected | TaskState::Vanished => color::warn(&text),
        _ => color::literal(&text),
    }
}

/// Metadata name, or the start of the command line for unlabelled tasks.
fn display_name(obs: &ProcessObservation) -> String {
    match obs.name {
        Some(ref name) => name.clone(),
        None => {
            let cmd: String = obs.cmd.chars().take(CMD_PREVIEW).collect();
            if obs.cmd.chars().count() > CMD_PREVIEW {
                format!("{cmd}…")
            } else {
                cmd
            }
        }
    }
}

pub fn format_launch(host: &str, outcome: &LaunchOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Launched '{}' on {} (pid {})",
        color::header(&outcome.name),
        host,
        outcome.pid
    );
    let _ = writeln!(out, "  log:  {}", color::context(&outcome.log_file.display().to_string()));
    let _ = write!(out, "  meta: {}", color::context(&outcome.meta_file.display().to_string()));
    out
}

fn format_observation(out: &mut String, obs: &ProcessObservation, state: TaskState) {
    let _ = writeln!(
        out,
        "  {:<7} {} {:>11}  cpu {:>6}  mem {:>6}  {}",
        obs.pid,
        state_label(state, 8),
        obs.etime.as_deref().unwrap_or("-"),
        percent(obs.cpu),
        percent(obs.mem),
        display_name(obs),
    );
    if let Some(last) = obs.log_tail.last() {
        let _ = writeln!(out, "          {}", color::muted(&format!("> {last}")));
    }
}

/// One host card: header line plus a row per task.
pub fn format_snapshot(host: &str, snapshot: &StatusSnapshot, stuck_window: usize) -> String {
    let mut out = String::new();
    let summary = if snapshot.running {
        format!("{} running", snapshot.count)
    } else {
        "no tasks running".to_string()
    };
    let _ = writeln!(
        out,
        "{}  {}  {}",
        color::header(host),
        summary,
        color::muted(&snapshot.timestamp)
    );
    for obs in &snapshot.processes {
        let state = if is_stuck(&obs.log_tail, stuck_window) {
            TaskState::StuckSuspected
        } else {
            TaskState::Running
        };
        format_observation(&mut out, obs, state);
    }
    out
}

/// Card for a host whose snapshot could not be read.
pub fn format_unavailable(host: &str, reason: &str) -> String {
    format!("{}  {}\n", color::header(host), color::warn(&format!("no data ({reason})")))
}

fn format_detail(out: &mut String, detail: &TaskDetail) {
    let log = detail.log_file.display().to_string();
    let Some(state) = detail.state else {
        let _ = writeln!(out, "\nTask {}: not found", color::literal(&log));
        return;
    };
    let _ = writeln!(out, "\nTask {}", color::literal(&log));
    let _ = writeln!(out, "  state:   {}", state_label(state, 0));
    if let Some(ref meta) = detail.meta {
        let _ = writeln!(out, "  name:    {}", meta.name);
        let _ = writeln!(out, "  started: {}", meta.started);
        let _ = writeln!(out, "  turns:   {}", meta.max_turns);
        let _ = writeln!(out, "  pid:     {}", meta.pid);
    }
    if !detail.log_tail.is_empty() {
        let _ = writeln!(out, "  tail:");
        for line in &detail.log_tail {
            let _ = writeln!(out, "    {}", color::muted(line));
        }
    }
}

/// Host card for the monitor. A host without a snapshot renders the
/// "no data" card; a focused task is still shown below it.
pub fn format_monitor(view: &MonitorView) -> String {
    let mut out = match view.timestamp {
        Some(ref timestamp) => {
            let summary = if view.tasks.is_empty() {
                "no tasks running".to_string()
            } else {
                format!("{} running", view.tasks.len())
            };
            let mut out = String::new();
            let _ = writeln!(
                out,
                "{}  {}  {}",
                color::header(&view.host),
                summary,
                color::muted(timestamp)
            );
            if let Some(ref error) = view.error {
                let _ = writeln!(out, "  {}", color::warn(error));
            }
            out
        }
        None => format_unavailable(&view.host, view.error.as_deref().unwrap_or("no snapshot")),
    };
    for task in &view.tasks {
        format_observation(&mut out, &task.observation, task.state);
    }
    if let Some(ref detail) = view.focus {
        format_detail(&mut out, detail);
    }
    out
}

/// JSON array with one object per host: the snapshot plus `host`, or
/// `{"host", "error"}` for a host that could not be read.
pub fn status_json(statuses: &[HostStatus]) -> anyhow::Result<serde_json::Value> {
    let mut hosts = Vec::with_capacity(statuses.len());
    for status in statuses {
        let value = match status.result {
            Ok(ref snapshot) => {
                let mut value = serde_json::to_value(snapshot)?;
                if let Some(obj) = value.as_object_mut() {
                    obj.insert("host".into(), status.host.clone().into());
                }
                value
            }
            Err(ref e) => serde_json::json!({ "host": status.host, "error": e.to_string() }),
        };
        hosts.push(value);
    }
    Ok(serde_json::Value::Array(hosts))
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
