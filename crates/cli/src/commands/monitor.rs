// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dlg monitor`: always exits 0; a host without data renders as such.

use anyhow::Result;
use clap::Args;
use dlg_adapters::ShellRouter;
use dlg_core::Config;
use dlg_engine::{Monitor, SnapshotReader};
use std::io::Write;

use crate::output::{format_monitor, print_json, OutputFormat};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Host whose snapshot to read
    #[arg(long)]
    pub host: Option<String>,

    /// Focus on the task writing this log file (path on the host)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<String>,

    /// Refresh every poll interval until Ctrl-C
    #[arg(long)]
    pub watch: bool,

    #[arg(short = 'o', long, value_enum, default_value_t)]
    pub output: OutputFormat,
}

pub async fn handle(args: MonitorArgs, config: Config) -> Result<()> {
    let config = super::with_host(config, args.host.clone());
    let reader = SnapshotReader::new(ShellRouter::for_config(&config), &config);
    let monitor = Monitor::new(reader, config.log_tail_lines, config.stuck_window);

    if !args.watch {
        let view = monitor.view(args.log_file.as_deref()).await;
        return match args.output {
            OutputFormat::Text => {
                print!("{}", format_monitor(&view));
                Ok(())
            }
            OutputFormat::Json => print_json(&view),
        };
    }

    let interval = config.poll_interval();
    loop {
        let view = monitor.view(args.log_file.as_deref()).await;
        let frame = match args.output {
            OutputFormat::Text => format_monitor(&view),
            OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&view)?),
        };
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{CLEAR_SCREEN}{frame}")?;
        stdout.flush()?;
        drop(stdout);

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("watch interrupted");
                return Ok(());
            }
        }
    }
}
