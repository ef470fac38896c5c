// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dlg_core::ProcessObservation;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn snapshot(count: u32) -> StatusSnapshot {
    let processes = (1..=count)
        .map(|pid| {
            let mut obs = ProcessObservation::new(pid, format!("claude -p task {pid}"));
            obs.log_tail = vec!["x".repeat(200); 5];
            obs
        })
        .collect();
    StatusSnapshot::new("2026-01-15T10:30:00+01:00".into(), processes)
}

#[test]
fn publish_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("state/status.json"));
    store.publish(&snapshot(2)).unwrap();
    assert_eq!(store.load().unwrap(), snapshot(2));
    assert!(!dir.path().join("state/status.json.tmp").exists());
}

#[test]
fn publish_overwrites_leftover_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("status.json"));
    let tmp = dir.path().join("status.json.tmp");
    std::fs::write(&tmp, "x".repeat(64 * 1024)).unwrap();

    store.publish(&snapshot(1)).unwrap();
    assert_eq!(store.load().unwrap(), snapshot(1));
    assert!(!tmp.exists());
}

#[test]
fn publish_replaces_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("status.json"));
    store.publish(&snapshot(3)).unwrap();
    store.publish(&snapshot(0)).unwrap();
    let loaded = store.load().unwrap();
    assert!(!loaded.running);
    assert_eq!(loaded.count, 0);
}

#[test]
fn missing_and_garbage_files_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("status.json"));
    assert!(matches!(store.load(), Err(StoreError::Io { .. })));
    std::fs::write(store.path(), "{\"timestamp\":").unwrap();
    assert!(matches!(store.load(), Err(StoreError::Decode { .. })));
}

#[test]
fn second_lock_is_refused_until_first_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("status.json"));
    let held = store.try_lock().unwrap();
    assert!(matches!(store.try_lock(), Err(StoreError::Locked(_))));
    drop(held);
    assert!(store.try_lock().is_ok());
}

#[test]
fn concurrent_reader_never_sees_partial_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("status.json"));
    store.publish(&snapshot(1)).unwrap();

    let done = Arc::new(AtomicBool::new(false));
    let reader = {
        let path = store.path().to_path_buf();
        let done = Arc::clone(&done);
        std::thread::spawn(move || {
            let mut reads = 0;
            while !done.load(Ordering::Relaxed) {
                let text = std::fs::read_to_string(&path).unwrap();
                let parsed: StatusSnapshot = serde_json::from_str(&text)
                    .unwrap_or_else(|e| panic!("partial snapshot after {reads} reads: {e}"));
                assert_eq!(parsed.count, parsed.processes.len());
                reads += 1;
            }
            reads
        })
    };

    for i in 0..300 {
        store.publish(&snapshot(i % 40)).unwrap();
    }
    done.store(true, Ordering::Relaxed);
    assert!(reader.join().unwrap() > 0);
}
