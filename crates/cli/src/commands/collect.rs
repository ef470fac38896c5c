// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dlg collect`: one collection pass on this machine, meant to be run
//! from cron or a systemd timer.

use anyhow::Result;
use clap::Args;
use dlg_adapters::ProcfsTable;
use dlg_core::{expand_home, Config, SystemClock};
use dlg_engine::{Collector, SnapshotStore, StoreError};
use std::path::PathBuf;

use crate::env;
use crate::exit_error::ExitError;
use crate::output::print_json;

#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Where to publish the snapshot (default from config)
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Print the snapshot instead of publishing it
    #[arg(long)]
    pub stdout: bool,

    /// Regex for runner command lines (default from config)
    #[arg(long)]
    pub pattern: Option<String>,
}

pub async fn handle(args: CollectArgs, mut config: Config) -> Result<()> {
    if let Some(pattern) = args.pattern {
        config.runner_pattern = pattern;
    }
    let collector = Collector::new(ProcfsTable::default(), SystemClock, &config)
        .map_err(|e| ExitError::usage(e.to_string()))?;

    if args.stdout {
        let snapshot = collector.collect().await?;
        return print_json(&snapshot);
    }

    let path = args
        .snapshot
        .unwrap_or_else(|| expand_home(&config.snapshot_path, env::home_dir().as_deref()));
    let store = SnapshotStore::new(path);
    let _lock = match store.try_lock() {
        Ok(lock) => lock,
        Err(StoreError::Locked(lock_path)) => {
            tracing::info!(lock = %lock_path.display(), "collector already running, skipping");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let snapshot = collector.collect().await?;
    store.publish(&snapshot)?;
    tracing::info!(path = %store.path().display(), count = snapshot.count, "snapshot published");
    Ok(())
}
