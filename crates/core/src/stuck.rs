// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heuristic for runners that keep repeating the same action.
//!
//! Only ever a warning for the operator; nothing is terminated on its basis.

/// Pull action lines out of a log tail: trimmed, non-empty, with a leading
/// bracketed timestamp (`[12:00:01] ...`) removed.
pub fn extract_actions<S: AsRef<str>>(lines: &[S]) -> Vec<&str> {
    lines
        .iter()
        .map(|l| strip_stamp(l.as_ref().trim()))
        .filter(|l| !l.is_empty())
        .collect()
}

/// True when the last `window` action lines are all the same.
///
/// Fewer than `window` action lines is never stuck.
pub fn is_stuck<S: AsRef<str>>(lines: &[S], window: usize) -> bool {
    let actions = extract_actions(lines);
    if window == 0 || actions.len() < window {
        return false;
    }
    let recent = &actions[actions.len() - window..];
    recent.iter().all(|a| *a == recent[0])
}

fn strip_stamp(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            return rest[end + 1..].trim_start();
        }
    }
    line
}

#[cfg(test)]
#[path = "stuck_tests.rs"]
mod tests;
