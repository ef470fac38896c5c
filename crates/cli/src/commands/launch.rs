// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dlg launch`

use anyhow::Result;
use clap::Args;
use dlg_adapters::ShellRouter;
use dlg_core::{Config, SystemClock};
use dlg_engine::{LaunchError, LaunchRequest, Launcher};

use crate::exit_error::ExitError;
use crate::output::{format_launch, print_json, OutputFormat};

#[derive(Args, Debug)]
pub struct LaunchArgs {
    /// Target host (`local` or an ssh destination)
    #[arg(long)]
    pub host: Option<String>,

    /// Turn budget for the runner (default from config)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_turns: Option<u32>,

    /// Log file on the target host (default: <log_dir>/task-<timestamp>.log)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<String>,

    /// Kill running tasks on the host first
    #[arg(long)]
    pub replace: bool,

    #[arg(short = 'o', long, value_enum, default_value_t)]
    pub output: OutputFormat,

    /// What the agent should do
    #[arg(required = true, trailing_var_arg = true, num_args = 1..)]
    pub instruction: Vec<String>,
}

impl LaunchArgs {
    fn request(&self) -> LaunchRequest {
        LaunchRequest {
            instruction: self.instruction.join(" "),
            max_turns: self.max_turns,
            log_file: self.log_file.clone(),
            replace: self.replace,
        }
    }
}

pub async fn handle(args: LaunchArgs, config: Config) -> Result<()> {
    let config = super::with_host(config, args.host.clone());
    let host = config.host.clone();
    let launcher = Launcher::new(ShellRouter::for_config(&config), SystemClock, config);

    let outcome = launcher.launch(args.request()).await.map_err(exit_error)?;
    match args.output {
        OutputFormat::Text => println!("{}", format_launch(&host, &outcome)),
        OutputFormat::Json => print_json(&serde_json::json!({
            "host": host,
            "pid": outcome.pid,
            "name": outcome.name,
            "log_file": outcome.log_file,
            "meta_file": outcome.meta_file,
        }))?,
    }
    Ok(())
}

/// Exit code for a failed launch: bad input is a usage error, an
/// unreachable host gets its own code.
pub(crate) fn exit_error(e: LaunchError) -> ExitError {
    match e {
        LaunchError::EmptyInstruction | LaunchError::InvalidMaxTurns => {
            ExitError::usage(e.to_string())
        }
        e if e.is_connection() => ExitError::unreachable(e.to_string()),
        e => ExitError::new(1, e.to_string()),
    }
}

#[cfg(test)]
#[path = "launch_tests.rs"]
mod tests;
