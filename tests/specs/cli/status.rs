// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dlg status` specs. Hosts without data render a card and never change
//! the exit code.

use crate::prelude::*;

const SNAPSHOT: &str = r#"{
  "timestamp": "2026-01-15T10:30:00+01:00",
  "running": true,
  "count": 1,
  "processes": [
    {
      "pid": 4242,
      "cpu": 12.5,
      "mem": 0.8,
      "etime": "01:35",
      "cmd": "claude --dangerously-skip-permissions -p Fix the flaky test --max-turns 200",
      "log": "/home/pi/tasks/t1.log",
      "log_tail": ["Read a", "Edit b"],
      "name": "Fix the flaky test",
      "started": "2026-01-15T09:28:25Z",
      "max_turns": 200
    }
  ]
}
"#;

fn sandbox_with_snapshot() -> Sandbox {
    let sandbox = Sandbox::empty();
    let path = sandbox.file("state/status.json", SNAPSHOT);
    sandbox.config(&format!("snapshot_path = \"{}\"\n", path.display()));
    sandbox
}

#[test]
fn missing_snapshot_renders_no_data() {
    let sandbox = Sandbox::empty();
    sandbox.config(&format!("snapshot_path = \"{}\"\n", sandbox.join("none.json").display()));
    sandbox.dlg().args(&["status"]).passes().stdout_has("local  no data (");
}

#[test]
fn published_snapshot_renders_card() {
    sandbox_with_snapshot()
        .dlg()
        .args(&["status"])
        .passes()
        .stdout_has("local  1 running  2026-01-15T10:30:00+01:00")
        .stdout_has("Fix the flaky test")
        .stdout_has("> Edit b");
}

#[test]
fn json_output_tags_each_host() {
    let run = sandbox_with_snapshot().dlg().args(&["status", "-o", "json"]).passes();
    let json = run.json();
    assert_eq!(json[0]["host"], "local");
    assert_eq!(json[0]["processes"][0]["pid"], 4242);
}

#[test]
fn unreachable_host_does_not_affect_others() {
    let sandbox = sandbox_with_snapshot();
    let path = sandbox.join(".config/dlg/config.toml");
    let mut config = std::fs::read_to_string(&path).unwrap();
    config.push_str("connect_timeout_ms = 1000\ncommand_timeout_ms = 5000\n");
    std::fs::write(&path, config).unwrap();

    let run = sandbox
        .dlg()
        .args(&["status", "--host", "local", "--host", "nobody@dlg-spec.invalid"])
        .passes()
        .stdout_has("local  1 running")
        .stdout_has("nobody@dlg-spec.invalid  no data (");
    assert!(run.stdout().find("local").unwrap() < run.stdout().find("nobody@").unwrap());
}
