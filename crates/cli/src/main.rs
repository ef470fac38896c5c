// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dlg: delegate coding tasks to agent runners on remote hosts and watch
//! them through published status snapshots.

mod color;
mod commands;
mod env;
mod exit_error;
mod output;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::{collect, kill, launch, monitor, status};

#[derive(Parser)]
#[command(
    name = "dlg",
    version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")),
    about = "Delegate coding tasks to remote agent runners",
    styles = color::styles(),
)]
struct Cli {
    /// Config file (default: ~/.config/dlg/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug); DLG_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a task on a host and record its metadata
    Launch(launch::LaunchArgs),
    /// Show tasks on a host, or one task by its log file
    Monitor(monitor::MonitorArgs),
    /// Observe runner processes on this machine and publish a snapshot
    Collect(collect::CollectArgs),
    /// Read published snapshots from one or more hosts
    Status(status::StatusArgs),
    /// Signal every runner process on a host
    Kill(kill::KillArgs),
}

fn init_logging(verbose: u8) {
    let filter = env::log_filter()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| {
            EnvFilter::new(match verbose {
                0 => "warn",
                1 => "info",
                _ => "debug",
            })
        });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };
    let config = env::load_config(cli.config.as_deref())?;
    match command {
        Commands::Launch(args) => launch::handle(args, config).await,
        Commands::Monitor(args) => monitor::handle(args, config).await,
        Commands::Collect(args) => collect::handle(args, config).await,
        Commands::Status(args) => status::handle(args, config).await,
        Commands::Kill(args) => kill::handle(args, config).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(exit_error::exit_code(&e));
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
