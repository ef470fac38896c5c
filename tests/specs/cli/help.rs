// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn dlg_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn dlg_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("launch")
        .stdout_has("monitor")
        .stdout_has("collect")
        .stdout_has("status")
        .stdout_has("kill");
}

#[test]
fn dlg_launch_help_shows_flags() {
    cli()
        .args(&["launch", "--help"])
        .passes()
        .stdout_has("--max-turns")
        .stdout_has("--log-file")
        .stdout_has("--replace");
}

#[test]
fn dlg_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    cli().args(&["frobnicate"]).exits(2);
}
