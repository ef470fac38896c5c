// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dlg launch` and `dlg kill` against the local host with a stand-in runner.

use crate::prelude::*;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const RUNNER: &str = r#"#!/bin/sh
i=0
while [ "$i" -lt 100 ]; do
  echo hello
  sleep 0.1
  i=$((i + 1))
done
"#;

fn sandbox_with_runner() -> (Sandbox, PathBuf) {
    let sandbox = Sandbox::empty();
    let runner = sandbox.file("bin/fake-runner", RUNNER);
    std::fs::set_permissions(&runner, std::fs::Permissions::from_mode(0o755)).unwrap();
    sandbox.config(&format!(
        "runner_command = \"{}\"\nlog_dir = \"{}\"\n",
        runner.display(),
        sandbox.join("tasks").display()
    ));
    (sandbox, runner)
}

fn escape(path: &std::path::Path) -> String {
    path.display().to_string().replace('.', "\\.")
}

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    false
}

#[test]
fn empty_instruction_is_a_usage_error() {
    cli().args(&["launch", "   "]).exits(2).stderr_has("instruction is empty");
}

#[test]
fn zero_max_turns_is_a_usage_error() {
    cli().args(&["launch", "--max-turns", "0", "go"]).exits(2);
}

#[test]
fn missing_runner_reports_the_shell_failure() {
    let sandbox = Sandbox::empty();
    sandbox.config("runner_command = \"/nonexistent/runner\"\n");
    sandbox.dlg().args(&["launch", "go"]).exits(1).stderr_has("command not found");
}

#[test]
fn launch_writes_metadata_then_kill_stops_the_task() {
    let (sandbox, runner) = sandbox_with_runner();
    let log = sandbox.join("tasks/hello.log");

    let run = sandbox
        .dlg()
        .args(&["launch", "--max-turns", "3", "--log-file", log.to_str().unwrap()])
        .args(&["Say", "hello.", "Then", "stop."])
        .passes()
        .stdout_has("Launched 'Say hello' on local (pid ");

    let meta_path = sandbox.join("tasks/hello.meta.json");
    let meta: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&meta_path).unwrap()).unwrap();
    assert_eq!(meta["name"], "Say hello");
    assert_eq!(meta["max_turns"], 3);
    assert_eq!(meta["log_file"], log.to_str().unwrap());
    assert!(run.stdout().contains(&format!("(pid {})", meta["pid"])));
    assert!(wait_for(|| std::fs::read_to_string(&log).is_ok_and(|t| t.contains("hello"))));

    sandbox
        .dlg()
        .args(&["kill", "--pattern", &escape(&runner)])
        .passes()
        .stdout_has("Signalled running tasks on local");
    assert!(wait_for(|| {
        let out = std::process::Command::new("pgrep").args(["-f", &escape(&runner)]).output();
        out.is_ok_and(|o| o.status.code() == Some(1))
    }));

    sandbox
        .dlg()
        .args(&["kill", "--pattern", &escape(&runner)])
        .passes()
        .stdout_has("No tasks running on local");
}

#[test]
fn default_log_name_lands_in_log_dir() {
    let (sandbox, runner) = sandbox_with_runner();
    sandbox.dlg().args(&["launch", "go"]).passes().stdout_has("/tasks/task-");

    let entries: Vec<String> = std::fs::read_dir(sandbox.join("tasks"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(entries.iter().any(|n| n.starts_with("task-") && n.ends_with(".meta.json")));

    sandbox.dlg().args(&["kill", "--pattern", &escape(&runner)]).passes();
}
