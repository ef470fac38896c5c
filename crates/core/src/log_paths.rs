// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task log naming and the log → metadata path convention.
//!
//! The metadata sidecar is the only link between a process found in the
//! process table (via its stdout log) and the intent recorded at launch, so
//! [`derive_metadata_path`] is the single place that convention lives.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

pub const LOG_EXT: &str = "log";
pub const META_SUFFIX: &str = ".meta.json";

/// `X.log` → `X.meta.json`.
///
/// Names without a `.log` suffix keep their whole file name and gain the
/// suffix: `X.txt` → `X.txt.meta.json`, `X` → `X.meta.json`.
pub fn derive_metadata_path(log_path: &Path) -> PathBuf {
    let file_name = log_path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let stem = match log_path.extension() {
        Some(ext) if ext == LOG_EXT => {
            log_path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
        }
        _ => file_name,
    };
    log_path.with_file_name(format!("{}{}", stem, META_SUFFIX))
}

/// Default log file name for a task started at `now`: `task-YYYYMMDD-HHMMSS.log`.
pub fn default_log_name(now: DateTime<Utc>) -> String {
    format!("task-{}.{}", now.format("%Y%m%d-%H%M%S"), LOG_EXT)
}

#[cfg(test)]
#[path = "log_paths_tests.rs"]
mod tests;
