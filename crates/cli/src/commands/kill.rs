// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dlg kill`

use anyhow::Result;
use clap::Args;
use dlg_adapters::ShellRouter;
use dlg_core::{Config, SystemClock};
use dlg_engine::Launcher;

use crate::color;
use crate::exit_error::ExitError;

#[derive(Args, Debug)]
pub struct KillArgs {
    /// Target host (`local` or an ssh destination)
    #[arg(long)]
    pub host: Option<String>,

    /// Regex for runner command lines (default from config)
    #[arg(long)]
    pub pattern: Option<String>,
}

pub async fn handle(args: KillArgs, config: Config) -> Result<()> {
    let mut config = super::with_host(config, args.host);
    if let Some(pattern) = args.pattern {
        config.runner_pattern = pattern;
    }
    config.validate().map_err(|e| ExitError::usage(e.to_string()))?;
    let host = config.host.clone();
    let launcher = Launcher::new(ShellRouter::for_config(&config), SystemClock, config);

    let signalled = launcher.kill_all().await.map_err(|e| {
        if e.is_connection() {
            ExitError::unreachable(e.to_string())
        } else {
            ExitError::new(1, e.to_string())
        }
    })?;
    if signalled {
        println!("Signalled running tasks on {}", color::header(&host));
    } else {
        println!("No tasks running on {}", color::header(&host));
    }
    Ok(())
}
