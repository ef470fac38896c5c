// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod collect;
pub mod kill;
pub mod launch;
pub mod monitor;
pub mod status;

use dlg_core::Config;

/// Apply a `--host` override on top of the loaded config.
pub(crate) fn with_host(config: Config, host: Option<String>) -> Config {
    match host {
        Some(host) => Config { host, ..config },
        None => config,
    }
}
