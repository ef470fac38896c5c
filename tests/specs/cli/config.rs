// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config file lookup and validation. Every config problem exits 2.

use crate::prelude::*;

#[test]
fn explicit_missing_config_file() {
    cli()
        .args(&["status", "--config", "/nonexistent/dlg.toml"])
        .exits(2)
        .stderr_has("failed to read config");
}

#[test]
fn dlg_config_env_points_at_missing_file() {
    cli().env("DLG_CONFIG", "/nonexistent/dlg.toml").args(&["status"]).exits(2);
}

#[test]
fn malformed_default_config() {
    let sandbox = Sandbox::empty();
    sandbox.config("host = [\n");
    sandbox.dlg().args(&["status"]).exits(2).stderr_has("invalid config");
}

#[test]
fn unknown_config_key_is_rejected() {
    let sandbox = Sandbox::empty();
    sandbox.config("hostname = \"pi@brain\"\n");
    sandbox.dlg().args(&["status"]).exits(2).stderr_has("hostname");
}

#[test]
fn zero_stuck_window_is_rejected() {
    let sandbox = Sandbox::empty();
    sandbox.config("stuck_window = 0\n");
    sandbox.dlg().args(&["status"]).exits(2).stderr_has("stuck_window");
}

#[test]
fn stuck_window_wider_than_tail_is_rejected() {
    let sandbox = Sandbox::empty();
    sandbox.config("stuck_window = 6\nlog_tail_lines = 5\n");
    sandbox.dlg().args(&["status"]).exits(2).stderr_has("must not exceed `log_tail_lines`");
}

#[test]
fn invalid_runner_pattern_is_rejected() {
    let sandbox = Sandbox::empty();
    sandbox.config("runner_pattern = \"claude(\"\n");
    sandbox.dlg().args(&["status"]).exits(2).stderr_has("runner_pattern");
}
