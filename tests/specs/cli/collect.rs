// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dlg collect` specs

use crate::prelude::*;

const NO_MATCH: &str = "dlg-spec-no-such-runner";

#[test]
fn invalid_pattern_flag_is_a_usage_error() {
    cli().args(&["collect", "--stdout", "--pattern", "("]).exits(2);
}

#[cfg(target_os = "linux")]
#[test]
fn stdout_snapshot_has_expected_shape() {
    // The collector's own command line contains the pattern; it must not
    // report itself.
    let run = cli().args(&["collect", "--stdout", "--pattern", NO_MATCH]).passes();
    let json = run.json();
    assert_eq!(json["running"], false);
    assert_eq!(json["count"], 0);
    assert_eq!(json["processes"], serde_json::json!([]));
    assert!(json["timestamp"].as_str().unwrap().contains('T'));
}

#[cfg(target_os = "linux")]
#[test]
fn publishes_snapshot_file() {
    let sandbox = Sandbox::empty();
    let path = sandbox.join("state/status.json");
    sandbox
        .dlg()
        .args(&["collect", "--pattern", NO_MATCH, "--snapshot", path.to_str().unwrap()])
        .passes();

    let text = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["count"], 0);
    assert!(!sandbox.join("state/status.json.tmp").exists());
}

#[cfg(target_os = "linux")]
#[test]
fn default_snapshot_path_comes_from_config() {
    let sandbox = Sandbox::empty();
    sandbox.config(&format!("runner_pattern = \"{NO_MATCH}\"\n"));
    sandbox.dlg().args(&["collect"]).passes();
    assert!(sandbox.join(".local/state/dlg/status.json").exists());
}
