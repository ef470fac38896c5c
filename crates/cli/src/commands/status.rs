// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dlg status`: one card per host. Unreachable hosts render as "no data"
//! and never fail the command.

use anyhow::Result;
use clap::Args;
use dlg_adapters::ShellRouter;
use dlg_core::Config;
use dlg_engine::{fetch_all, SnapshotReader};

use crate::output::{format_snapshot, format_unavailable, print_json, status_json, OutputFormat};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Host to poll (repeatable; default: `hosts` from config, else `host`)
    #[arg(long = "host", value_name = "HOST")]
    pub hosts: Vec<String>,

    #[arg(short = 'o', long, value_enum, default_value_t)]
    pub output: OutputFormat,
}

/// Hosts to poll: flags, then the configured list, then the single host.
pub(crate) fn resolve_hosts(flags: Vec<String>, config: &Config) -> Vec<String> {
    if !flags.is_empty() {
        flags
    } else if !config.hosts.is_empty() {
        config.hosts.clone()
    } else {
        vec![config.host.clone()]
    }
}

pub async fn handle(args: StatusArgs, config: Config) -> Result<()> {
    let readers: Vec<_> = resolve_hosts(args.hosts, &config)
        .iter()
        .map(|host| {
            let host_config = config.for_host(host);
            SnapshotReader::new(ShellRouter::for_config(&host_config), &host_config)
        })
        .collect();
    let statuses = fetch_all(&readers).await;

    match args.output {
        OutputFormat::Json => print_json(&status_json(&statuses)?)?,
        OutputFormat::Text => {
            let cards: Vec<String> = statuses
                .iter()
                .map(|status| match status.result {
                    Ok(ref snapshot) => {
                        format_snapshot(&status.host, snapshot, config.stuck_window)
                    }
                    Err(ref e) => format_unavailable(&status.host, &e.to_string()),
                })
                .collect();
            print!("{}", cards.join("\n"));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
