// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task metadata sidecar records.
//!
//! A record is written once at launch next to the task log (see
//! [`crate::derive_metadata_path`]) and only read afterwards. The collector
//! treats a missing record and a corrupt one the same way: the observation
//! simply has no metadata.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum task name length, in characters.
pub const NAME_CAP: usize = 120;

#[derive(Debug, Error)]
pub enum MetaError {
    #[error("metadata is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("metadata field `max_turns` must be greater than zero")]
    ZeroMaxTurns,
}

/// Metadata sidecar written at launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskMeta {
    pub name: String,
    /// UTC ISO-8601 launch time.
    pub started: String,
    /// Absolute path of the task log on the task's host.
    pub log_file: PathBuf,
    pub max_turns: u32,
    pub pid: u32,
}

impl TaskMeta {
    /// Parse a full record; any missing or mistyped field rejects the whole record.
    pub fn parse(text: &str) -> Result<Self, MetaError> {
        let meta: TaskMeta = serde_json::from_str(text)?;
        if meta.max_turns == 0 {
            return Err(MetaError::ZeroMaxTurns);
        }
        Ok(meta)
    }

    pub fn to_json(&self) -> Result<String, MetaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read a metadata sidecar. Missing and unparseable files both yield `None`.
pub fn read_meta(path: &Path) -> Option<TaskMeta> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no task metadata");
            return None;
        }
    };
    match TaskMeta::parse(&text) {
        Ok(meta) => Some(meta),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt task metadata");
            None
        }
    }
}

/// Derive a short human-readable task name from an instruction.
///
/// Line breaks collapse to spaces and leading whitespace is dropped; the name
/// ends before the first `.`, `!`, or `?`, or at [`NAME_CAP`] characters,
/// whichever comes first. Whitespace left before the cut is dropped too, so
/// `"Tidy up . rest"` names `"Tidy up"`. An instruction that opens with
/// punctuation falls back to its first [`NAME_CAP`] characters. Returns
/// `None` when the instruction has no content.
pub fn task_name(instruction: &str) -> Option<String> {
    let collapsed: String = instruction
        .replace("\r\n", " ")
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let body = collapsed.trim_start();
    if body.is_empty() {
        return None;
    }

    let sentence: String =
        body.chars().take_while(|c| !matches!(c, '.' | '!' | '?')).take(NAME_CAP).collect();
    let sentence = sentence.trim_end();
    if !sentence.is_empty() {
        return Some(sentence.to_string());
    }

    let fallback: String = body.chars().take(NAME_CAP).collect();
    Some(fallback.trim_end().to_string())
}

#[cfg(test)]
#[path = "meta_tests.rs"]
mod tests;
