// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status collector: one pass over the local process table.
//!
//! Every per-process query runs on the blocking pool under its own timeout.
//! A query that fails or overruns leaves that field empty; the rest of the
//! observation, and every other process, is unaffected.

use dlg_adapters::{ProcessEntry, ProcessTable, ProcessTableError};
use dlg_core::{
    derive_metadata_path, format_etime, format_local, is_excluded, read_meta, Clock, Config,
    ConfigError, ProcessObservation, RunnerMatcher, StatusSnapshot,
};
use futures_util::future::join_all;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::Instrument;

const TAIL_CHUNK: u64 = 8 * 1024;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("cannot list processes: {0}")]
    List(#[from] ProcessTableError),

    #[error("process listing timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("process listing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub struct Collector<P: ProcessTable, C: Clock> {
    table: Arc<P>,
    clock: C,
    matcher: RunnerMatcher,
    list_timeout: Duration,
    query_timeout: Duration,
    tail_lines: usize,
    self_pid: u32,
}

impl<P: ProcessTable, C: Clock> Collector<P, C> {
    pub fn new(table: P, clock: C, config: &Config) -> Result<Self, ConfigError> {
        let matcher = RunnerMatcher::new(&config.runner_pattern).map_err(|source| {
            ConfigError::Pattern { pattern: config.runner_pattern.clone(), source }
        })?;
        Ok(Self {
            table: Arc::new(table),
            clock,
            matcher,
            list_timeout: config.command_timeout(),
            query_timeout: config.query_timeout(),
            tail_lines: config.log_tail_lines,
            self_pid: std::process::id(),
        })
    }

    /// Treat `pid` as the collector's own process (it is never reported).
    pub fn with_self_pid(mut self, pid: u32) -> Self {
        self.self_pid = pid;
        self
    }

    pub async fn collect(&self) -> Result<StatusSnapshot, CollectError> {
        let span = tracing::info_span!("collect", pattern = self.matcher.as_str());
        self.pass().instrument(span).await
    }

    async fn pass(&self) -> Result<StatusSnapshot, CollectError> {
        let started = Instant::now();
        let table = Arc::clone(&self.table);
        let entries =
            tokio::time::timeout(self.list_timeout, tokio::task::spawn_blocking(move || table.list()))
                .await
                .map_err(|_| CollectError::Timeout(self.list_timeout))???;

        let candidates: Vec<ProcessEntry> = entries
            .into_iter()
            .filter(|e| self.matcher.matches(&e.argv))
            .filter(|e| !is_excluded(e.pid, &e.argv, self.self_pid))
            .collect();
        let observations = join_all(candidates.into_iter().map(|e| self.observe(e))).await;

        let snapshot = StatusSnapshot::new(format_local(self.clock.now()), observations);
        tracing::info!(
            count = snapshot.count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "collected"
        );
        Ok(snapshot)
    }

    async fn observe(&self, entry: ProcessEntry) -> ProcessObservation {
        let pid = entry.pid;
        let (cpu, mem, elapsed, stdout) = tokio::join!(
            self.query(pid, "cpu", move |t: &P| t.cpu_percent(pid)),
            self.query(pid, "mem", move |t: &P| t.mem_percent(pid)),
            self.query(pid, "etime", move |t: &P| t.elapsed_secs(pid)),
            self.query(pid, "stdout", move |t: &P| t.stdout_target(pid)),
        );

        let mut observation = ProcessObservation::new(pid, entry.command_line());
        observation.cpu = cpu;
        observation.mem = mem;
        observation.etime = elapsed.map(|s| format_etime(Duration::from_secs(s)));

        if let Some(log) = stdout.flatten() {
            observation.log_tail = self.tail(&log).await;
            if let Some(meta) = read_meta(&derive_metadata_path(&log)) {
                observation.merge_meta(meta);
            }
            observation.log = Some(log);
        }
        observation
    }

    async fn query<T, F>(&self, pid: u32, field: &'static str, f: F) -> Option<T>
    where
        T: Send + 'static,
        F: FnOnce(&P) -> Result<T, ProcessTableError> + Send + 'static,
    {
        let table = Arc::clone(&self.table);
        let task = tokio::task::spawn_blocking(move || f(table.as_ref()));
        match tokio::time::timeout(self.query_timeout, task).await {
            Ok(Ok(Ok(value))) => Some(value),
            Ok(Ok(Err(e))) => {
                tracing::debug!(pid, field, error = %e, "process query failed");
                None
            }
            Ok(Err(e)) => {
                tracing::warn!(pid, field, error = %e, "process query task failed");
                None
            }
            Err(_) => {
                let timeout_ms = self.query_timeout.as_millis() as u64;
                tracing::warn!(pid, field, timeout_ms, "process query timed out");
                None
            }
        }
    }

    async fn tail(&self, log: &Path) -> Vec<String> {
        let path: PathBuf = log.to_path_buf();
        let lines = self.tail_lines;
        let task = tokio::task::spawn_blocking(move || {
            if !path.is_file() {
                return Ok(Vec::new());
            }
            read_tail(&path, lines)
        });
        match tokio::time::timeout(self.query_timeout, task).await {
            Ok(Ok(Ok(tail))) => tail,
            Ok(Ok(Err(e))) => {
                tracing::debug!(log = %log.display(), error = %e, "cannot read log tail");
                Vec::new()
            }
            Ok(Err(_)) | Err(_) => {
                tracing::warn!(log = %log.display(), "log tail read did not finish");
                Vec::new()
            }
        }
    }
}

/// Last `lines` lines of a file, read backwards from the end.
pub fn read_tail(path: &Path, lines: usize) -> std::io::Result<Vec<String>> {
    if lines == 0 {
        return Ok(Vec::new());
    }
    let mut file = File::open(path)?;
    let mut pos = file.metadata()?.len();
    let mut buf: Vec<u8> = Vec::new();
    while pos > 0 {
        let step = TAIL_CHUNK.min(pos);
        pos -= step;
        file.seek(SeekFrom::Start(pos))?;
        let mut chunk = vec![0; step as usize];
        file.read_exact(&mut chunk)?;
        chunk.extend_from_slice(&buf);
        buf = chunk;
        // lines + 1 newlines guarantee the kept lines are complete
        if buf.iter().filter(|b| **b == b'\n').count() > lines {
            break;
        }
    }
    let text = String::from_utf8_lossy(&buf);
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    Ok(all[start..].iter().map(|l| l.to_string()).collect())
}

#[cfg(test)]
#[path = "collector_tests.rs"]
mod tests;
