// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recognizing runner processes in a process table.
//!
//! A process counts as a task when its command line matches the runner
//! pattern and it is not excluded by [`is_excluded`]. Both checks are pure so
//! they can be tested without a live process table.

use regex::Regex;

/// Shells whose `-c` invocations wrap the real runner.
const SHELLS: &[&str] = &["sh", "bash", "zsh", "dash", "ksh", "fish"];

/// Transports that carry the runner's command line to another host.
const TRANSPORTS: &[&str] = &["ssh", "mosh", "autossh"];

/// Helpers that show up while the process table is being enumerated or a
/// kill-by-pattern is in flight.
const HELPERS: &[&str] = &["pgrep", "pkill", "ps", "grep", "tail", "watch", "timeout", "nohup"];

/// Compiled runner pattern.
#[derive(Debug, Clone)]
pub struct RunnerMatcher {
    pattern: Regex,
}

impl RunnerMatcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self { pattern: Regex::new(pattern)? })
    }

    /// Whether the joined command line matches the runner pattern.
    pub fn matches(&self, argv: &[String]) -> bool {
        !argv.is_empty() && self.pattern.is_match(&argv.join(" "))
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Whether a matching process is a wrapper or helper rather than a task.
///
/// Excluded: the enumerating process itself, shell `-c` wrappers, transport
/// clients whose arguments contain the runner command, and enumeration/kill
/// helpers.
pub fn is_excluded(pid: u32, argv: &[String], self_pid: u32) -> bool {
    if pid == self_pid {
        return true;
    }
    let Some(program) = argv.first().map(|a| basename(a)) else {
        return true;
    };
    let mut options = argv.iter().skip(1).take_while(|a| a.starts_with('-'));
    if SHELLS.contains(&program) && options.any(|a| is_command_flag(a)) {
        return true;
    }
    TRANSPORTS.contains(&program) || HELPERS.contains(&program)
}

/// `-c`, or a clustered short-flag group containing `c` such as `-lc`.
fn is_command_flag(arg: &str) -> bool {
    match arg.strip_prefix('-') {
        Some(flags) if !flags.starts_with('-') => flags.contains('c'),
        _ => false,
    }
}

fn basename(arg: &str) -> &str {
    let name = arg.rsplit('/').next().unwrap_or(arg);
    // Login shells show up as `-bash`
    name.strip_prefix('-').unwrap_or(name)
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
