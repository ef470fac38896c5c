// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    zero          = { 0,          "00:00" },
    seconds       = { 7,          "00:07" },
    minutes       = { 125,        "02:05" },
    one_hour      = { 3600,       "01:00:00" },
    hours         = { 45_296,     "12:34:56" },
    one_day       = { 86_400,     "1-00:00:00" },
    days          = { 273_906,    "3-04:05:06" },
)]
fn etime_matches_ps_layout(secs: u64, expected: &str) {
    assert_eq!(format_etime(Duration::from_secs(secs)), expected);
}

#[test]
fn utc_format_has_z_suffix() {
    let t = DateTime::from_timestamp(1_768_469_400, 0).unwrap();
    assert_eq!(format_utc(t), "2026-01-15T09:30:00Z");
}

#[test]
fn utc_and_local_formats_parse_back_to_same_instant() {
    let t = DateTime::from_timestamp(1_768_469_400, 0).unwrap();
    assert_eq!(parse_timestamp(&format_utc(t)), Some(t));
    assert_eq!(parse_timestamp(&format_local(t)), Some(t));
}

#[test]
fn parse_rejects_garbage() {
    assert_eq!(parse_timestamp("yesterday"), None);
    assert_eq!(parse_timestamp(""), None);
}
