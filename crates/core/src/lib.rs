// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dlg-core: domain types for delegating coding tasks to remote hosts and
//! tracking them through periodic status snapshots.

pub mod clock;
pub mod config;
pub mod filter;
pub mod log_paths;
pub mod meta;
pub mod quote;
pub mod snapshot;
pub mod state;
pub mod stuck;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
pub use clock::{Clock, SystemClock};
pub use config::{expand_home, is_local_host, Config, ConfigError, LOCAL_HOST};
pub use filter::{is_excluded, RunnerMatcher};
pub use log_paths::{default_log_name, derive_metadata_path};
pub use meta::{read_meta, task_name, MetaError, TaskMeta, NAME_CAP};
pub use quote::{absolute_path_expr, remote_path_expr, shell_quote};
pub use snapshot::{ProcessObservation, StatusSnapshot};
pub use state::TaskState;
pub use stuck::{extract_actions, is_stuck};
pub use time_fmt::{format_etime, format_local, format_utc, parse_timestamp};
