// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dlg-engine: launching tasks, collecting and publishing host status, and
//! reading it back.

pub mod collector;
pub mod launcher;
pub mod monitor;
pub mod reader;
pub mod store;

pub use collector::{read_tail, CollectError, Collector};
pub use launcher::{LaunchError, LaunchOutcome, LaunchRequest, Launcher};
pub use monitor::{Monitor, MonitorError, MonitorView, ObservedTask, TaskDetail};
pub use reader::{fetch_all, FetchError, HostStatus, SnapshotReader};
pub use store::{SnapshotStore, StoreError, StoreLock};
