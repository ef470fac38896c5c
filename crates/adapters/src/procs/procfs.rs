// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Linux `/proc` reader.

use super::{ProcessEntry, ProcessTable, ProcessTableError};
use std::path::{Path, PathBuf};

/// Clock ticks per second for `/proc/<pid>/stat` times. Fixed at 100 on
/// every Linux ABI the runner ships for.
const USER_HZ: f64 = 100.0;

// Zero-based offsets into the fields that follow the `(comm)` entry.
const STAT_UTIME: usize = 11;
const STAT_STIME: usize = 12;
const STAT_STARTTIME: usize = 19;

/// Process table backed by a procfs mount.
#[derive(Debug, Clone)]
pub struct ProcfsTable {
    root: PathBuf,
}

impl Default for ProcfsTable {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcfsTable {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn pid_path(&self, pid: u32, file: &str) -> PathBuf {
        self.root.join(pid.to_string()).join(file)
    }

    fn read(&self, path: &Path, pid: Option<u32>) -> Result<String, ProcessTableError> {
        std::fs::read_to_string(path).map_err(|source| match (source.kind(), pid) {
            (std::io::ErrorKind::NotFound, Some(pid)) => ProcessTableError::NotFound(pid),
            _ => ProcessTableError::Io { path: path.to_path_buf(), source },
        })
    }

    fn stat_fields(&self, pid: u32) -> Result<Vec<u64>, ProcessTableError> {
        let path = self.pid_path(pid, "stat");
        let raw = self.read(&path, Some(pid))?;
        // comm may itself contain spaces and parentheses
        let rest = raw.rfind(')').map(|i| &raw[i + 1..]).ok_or_else(|| {
            ProcessTableError::Malformed { path: path.clone(), reason: "missing `)`".into() }
        })?;
        let fields: Vec<u64> = rest
            .split_whitespace()
            .map(|f| f.parse::<i64>().map(|v| v.max(0) as u64).unwrap_or(0))
            .collect();
        if fields.len() <= STAT_STARTTIME {
            return Err(ProcessTableError::Malformed {
                path,
                reason: format!("only {} fields", fields.len()),
            });
        }
        Ok(fields)
    }

    fn uptime_secs(&self) -> Result<f64, ProcessTableError> {
        let path = self.root.join("uptime");
        let raw = self.read(&path, None)?;
        raw.split_whitespace().next().and_then(|v| v.parse::<f64>().ok()).ok_or_else(|| {
            ProcessTableError::Malformed { path, reason: "no uptime value".into() }
        })
    }

    /// Elapsed seconds and total CPU seconds for `pid`.
    fn times(&self, pid: u32) -> Result<(f64, f64), ProcessTableError> {
        let fields = self.stat_fields(pid)?;
        let uptime = self.uptime_secs()?;
        let started = fields[STAT_STARTTIME] as f64 / USER_HZ;
        let cpu = (fields[STAT_UTIME] + fields[STAT_STIME]) as f64 / USER_HZ;
        Ok(((uptime - started).max(0.0), cpu))
    }
}

/// Value of a `Key:   1234 kB` line.
fn kb_field(text: &str, key: &str) -> Option<u64> {
    text.lines()
        .find_map(|line| line.strip_prefix(key)?.strip_prefix(':'))
        .and_then(|v| v.split_whitespace().next())
        .and_then(|v| v.parse().ok())
}

impl ProcessTable for ProcfsTable {
    fn list(&self) -> Result<Vec<ProcessEntry>, ProcessTableError> {
        let dir = std::fs::read_dir(&self.root)
            .map_err(|source| ProcessTableError::Io { path: self.root.clone(), source })?;
        let mut entries = Vec::new();
        for entry in dir.flatten() {
            let Some(pid) = entry.file_name().to_str().and_then(|n| n.parse::<u32>().ok()) else {
                continue;
            };
            // Processes exit between readdir and read
            let Ok(raw) = std::fs::read(entry.path().join("cmdline")) else {
                continue;
            };
            let argv: Vec<String> = raw
                .split(|b| *b == 0)
                .filter(|a| !a.is_empty())
                .map(|a| String::from_utf8_lossy(a).into_owned())
                .collect();
            // Kernel threads and zombies
            if argv.is_empty() {
                continue;
            }
            entries.push(ProcessEntry { pid, argv });
        }
        entries.sort_by_key(|e| e.pid);
        Ok(entries)
    }

    fn cpu_percent(&self, pid: u32) -> Result<f32, ProcessTableError> {
        let (elapsed, cpu) = self.times(pid)?;
        if elapsed <= 0.0 {
            return Ok(0.0);
        }
        Ok((cpu / elapsed * 100.0) as f32)
    }

    fn mem_percent(&self, pid: u32) -> Result<f32, ProcessTableError> {
        let status_path = self.pid_path(pid, "status");
        let status = self.read(&status_path, Some(pid))?;
        let rss = kb_field(&status, "VmRSS").unwrap_or(0);
        let meminfo_path = self.root.join("meminfo");
        let meminfo = self.read(&meminfo_path, None)?;
        let total = kb_field(&meminfo, "MemTotal").filter(|t| *t > 0).ok_or_else(|| {
            ProcessTableError::Malformed { path: meminfo_path, reason: "no MemTotal".into() }
        })?;
        Ok((rss as f64 / total as f64 * 100.0) as f32)
    }

    fn elapsed_secs(&self, pid: u32) -> Result<u64, ProcessTableError> {
        let (elapsed, _) = self.times(pid)?;
        Ok(elapsed as u64)
    }

    fn stdout_target(&self, pid: u32) -> Result<Option<PathBuf>, ProcessTableError> {
        let link = self.root.join(pid.to_string()).join("fd").join("1");
        let target = match std::fs::read_link(&link) {
            Ok(target) => target,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProcessTableError::NotFound(pid))
            }
            Err(source) => return Err(ProcessTableError::Io { path: link, source }),
        };
        let text = target.to_string_lossy();
        // pipe:[123], socket:[456], anon_inode:... and terminals are not logs
        if !text.starts_with('/') || text.starts_with("/dev/") {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(text.strip_suffix(" (deleted)").unwrap_or(&text))))
    }
}

#[cfg(test)]
#[path = "procfs_tests.rs"]
mod tests;
