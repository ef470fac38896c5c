// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dlg monitor` specs. A host without a snapshot is rendered, not an error.

use crate::prelude::*;

const META: &str = r#"{
  "name": "Fix the flaky test",
  "started": "2026-01-15T09:28:25Z",
  "log_file": "LOG",
  "max_turns": 50,
  "pid": 4242
}
"#;

fn sandbox_without_snapshot() -> Sandbox {
    let sandbox = Sandbox::empty();
    sandbox.config(&format!("snapshot_path = \"{}\"\n", sandbox.join("none.json").display()));
    sandbox
}

#[test]
fn missing_snapshot_renders_no_data() {
    sandbox_without_snapshot()
        .dlg()
        .args(&["monitor"])
        .passes()
        .stdout_has("local  no data (no snapshot at");
}

#[test]
fn missing_snapshot_json_carries_the_error() {
    let run = sandbox_without_snapshot().dlg().args(&["monitor", "-o", "json"]).passes();
    let json = run.json();
    assert_eq!(json["host"], "local");
    assert!(json["error"].as_str().unwrap().contains("no snapshot"));
}

#[test]
fn fresh_task_is_launched_before_first_collection() {
    let sandbox = sandbox_without_snapshot();
    let log = sandbox.file("tasks/t1.log", "starting\n");
    sandbox.file("tasks/t1.meta.json", &META.replace("LOG", log.to_str().unwrap()));

    sandbox
        .dlg()
        .args(&["monitor", "--log-file", log.to_str().unwrap()])
        .passes()
        .stdout_has("local  no data (")
        .stdout_has("  state:   launched\n")
        .stdout_has("  name:    Fix the flaky test\n")
        .stdout_has("    starting\n");
}

#[test]
fn unknown_task_is_not_found() {
    let sandbox = sandbox_without_snapshot();
    let log = sandbox.join("tasks/missing.log");
    sandbox
        .dlg()
        .args(&["monitor", "--log-file", log.to_str().unwrap()])
        .passes()
        .stdout_has(": not found");
}
