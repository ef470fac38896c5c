// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dlg-adapters: transports to target hosts and access to the process table.

pub mod procs;
pub mod shell;

pub use procs::{ProcessEntry, ProcessTable, ProcessTableError, ProcfsTable};
pub use shell::{LocalShell, RemoteShell, ShellError, ShellOutput, ShellRouter, SshShell};

#[cfg(any(test, feature = "test-support"))]
pub use procs::{FakeProcess, FakeProcessTable};
#[cfg(any(test, feature = "test-support"))]
pub use shell::{FakeResponse, FakeShell, ShellCall};
