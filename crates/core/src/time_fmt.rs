// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timestamp and duration formatting shared by metadata, snapshots, and display.

use chrono::{DateTime, Local, Utc};
use std::time::Duration;

/// Format as UTC ISO-8601 with a `Z` suffix, e.g. `2026-01-15T09:30:00Z`.
pub fn format_utc(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Format in the host's local zone with its offset, e.g. `2026-01-15T10:30:00+01:00`.
pub fn format_local(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Parse either of the above back into UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).ok().map(|t| t.with_timezone(&Utc))
}

/// Format an elapsed duration the way `ps -o etime` does:
/// `MM:SS`, `HH:MM:SS`, or `D-HH:MM:SS`.
pub fn format_etime(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    if days > 0 {
        format!("{}-{:02}:{:02}:{:02}", days, hours, mins, secs)
    } else if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
