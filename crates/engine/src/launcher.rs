// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task launcher: starts a detached runner on the target host and records
//! its metadata sidecar before returning.

use dlg_adapters::{RemoteShell, ShellError};
use dlg_core::{
    absolute_path_expr, default_log_name, derive_metadata_path, format_utc, shell_quote,
    task_name, Clock, Config, MetaError, TaskMeta,
};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::Instrument;

const REPLACE_POLL: Duration = Duration::from_millis(200);

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("instruction is empty")]
    EmptyInstruction,

    #[error("max turns must be greater than zero")]
    InvalidMaxTurns,

    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error("{host}: unexpected launch reply `{reply}`")]
    BadReply { host: String, reply: String },

    #[error("task {pid} started ({}) but its metadata could not be written: {source}", log_file.display())]
    Metadata { pid: u32, log_file: PathBuf, source: ShellError },

    #[error(transparent)]
    Encode(#[from] MetaError),
}

impl LaunchError {
    /// Whether the host could not be reached before anything was started.
    pub fn is_connection(&self) -> bool {
        matches!(self, LaunchError::Shell(e) if e.is_connection())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    pub instruction: String,
    /// Turn budget; the configured default when `None`.
    pub max_turns: Option<u32>,
    /// Log path on the target host (`~/` and relative paths allowed).
    pub log_file: Option<String>,
    /// Kill running tasks before starting this one.
    pub replace: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub pid: u32,
    pub name: String,
    pub log_file: PathBuf,
    pub meta_file: PathBuf,
}

/// Launches tasks on one host.
pub struct Launcher<S: RemoteShell, C: Clock> {
    shell: S,
    clock: C,
    config: Config,
}

impl<S: RemoteShell, C: Clock> Launcher<S, C> {
    pub fn new(shell: S, clock: C, config: Config) -> Self {
        Self { shell, clock, config }
    }

    pub async fn launch(&self, request: LaunchRequest) -> Result<LaunchOutcome, LaunchError> {
        let name = task_name(&request.instruction).ok_or(LaunchError::EmptyInstruction)?;
        let max_turns = request.max_turns.unwrap_or(self.config.max_turns_default);
        if max_turns == 0 {
            return Err(LaunchError::InvalidMaxTurns);
        }

        let span = tracing::info_span!("launch", host = %self.shell.host(), max_turns);
        self.start(request, name, max_turns).instrument(span).await
    }

    async fn start(
        &self,
        request: LaunchRequest,
        name: String,
        max_turns: u32,
    ) -> Result<LaunchOutcome, LaunchError> {
        if request.replace {
            self.replace_running().await?;
        }

        let started = self.clock.now();
        let claim = request.log_file.is_none();
        let log_file = request.log_file.unwrap_or_else(|| {
            format!("{}/{}", self.config.log_dir.trim_end_matches('/'), default_log_name(started))
        });
        let script = self.spawn_script(&request.instruction, max_turns, &log_file, claim);
        let output =
            self.shell.run_checked(&script, None, self.config.command_timeout()).await?;
        let (pid, log_file) = parse_reply(&output.stdout).ok_or_else(|| {
            LaunchError::BadReply {
                host: self.shell.host().to_string(),
                reply: output.stdout.trim().to_string(),
            }
        })?;
        tracing::info!(pid, log_file = %log_file.display(), "task started");

        let meta = TaskMeta {
            name: name.clone(),
            started: format_utc(started),
            log_file: log_file.clone(),
            max_turns,
            pid,
        };
        let meta_file = derive_metadata_path(&log_file);
        let json = meta.to_json()?;
        let write = format!(
            "meta={}\ntmp=\"$meta.tmp.$$\"\ncat > \"$tmp\" && mv -f \"$tmp\" \"$meta\"\n",
            shell_quote(&meta_file.to_string_lossy())
        );
        if let Err(source) = self
            .shell
            .run_checked(&write, Some(json.as_bytes()), self.config.command_timeout())
            .await
        {
            return Err(LaunchError::Metadata { pid, log_file, source });
        }

        Ok(LaunchOutcome { pid, name, log_file, meta_file })
    }

    /// Signal every runner process on the host. Returns whether any matched.
    pub async fn kill_all(&self) -> Result<bool, ShellError> {
        let output = self
            .shell
            .run(KILL_SCRIPT, Some(self.pattern_line().as_bytes()), self.config.command_timeout())
            .await?;
        match output.code {
            0 => {
                tracing::info!(host = %self.shell.host(), "signalled running tasks");
                Ok(true)
            }
            1 => Ok(false),
            code => Err(ShellError::Failed {
                host: self.shell.host().to_string(),
                code,
                stderr: output.stderr.trim().to_string(),
            }),
        }
    }

    /// Whether any runner process is still alive on the host.
    pub async fn any_running(&self) -> Result<bool, ShellError> {
        let output = self
            .shell
            .run(RUNNING_SCRIPT, Some(self.pattern_line().as_bytes()), self.config.command_timeout())
            .await?;
        Ok(output.code == 0)
    }

    async fn replace_running(&self) -> Result<(), ShellError> {
        if !self.kill_all().await? {
            return Ok(());
        }
        let deadline = Instant::now() + self.config.replace_grace();
        loop {
            if !self.any_running().await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                tracing::warn!(
                    host = %self.shell.host(),
                    grace_ms = self.config.replace_grace_ms,
                    "old tasks still running after grace period, launching anyway"
                );
                return Ok(());
            }
            tokio::time::sleep(REPLACE_POLL).await;
        }
    }

    fn pattern_line(&self) -> String {
        format!("{}\n", self.config.runner_pattern)
    }

    /// With `claim`, the log path is created exclusively before the runner
    /// starts; a taken name gets a `-N` suffix so launches in the same second
    /// never share a log.
    fn spawn_script(
        &self,
        instruction: &str,
        max_turns: u32,
        log_file: &str,
        claim: bool,
    ) -> String {
        let program = self.config.runner_command.split_whitespace().next().unwrap_or_default();
        format!(
            "log={log}\n\
             command -v {prog} >/dev/null 2>&1 || {{ printf '%s: command not found\\n' {prog} >&2; exit 127; }}\n\
             mkdir -p \"$(dirname \"$log\")\" || exit 1\n\
             {claim}\
             nohup {runner} -p {instruction} --max-turns {max_turns} > \"$log\" 2>&1 < /dev/null &\n\
             printf '%s\\t%s\\n' \"$!\" \"$log\"\n",
            log = absolute_path_expr(log_file),
            prog = shell_quote(program),
            runner = self.config.runner_command,
            instruction = shell_quote(instruction),
            claim = if claim { CLAIM_LOG } else { "" },
        )
    }
}

// `set -C` makes `>` fail on an existing file, so each name is taken once.
const CLAIM_LOG: &str = r#"base=${log%.log}
n=1
until ( set -C; : > "$log" ) 2>/dev/null; do
  n=$((n+1))
  [ "$n" -le 100 ] || { printf 'no free log name at %s\n' "$base" >&2; exit 1; }
  log="$base-$n.log"
done
"#;

// The pattern arrives on stdin so the wrapping shell's own command line
// never matches it.
// The invoking process (`$PPID`) may carry the pattern in its own arguments.
const KILL_SCRIPT: &str = r#"read -r pat
pids=$(pgrep -f -- "$pat")
rc=$?
[ "$rc" -gt 1 ] && exit "$rc"
found=1
for pid in $pids; do
  [ "$pid" = "$PPID" ] && continue
  kill "$pid" 2>/dev/null && found=0
done
exit "$found"
"#;
const RUNNING_SCRIPT: &str = r#"read -r pat
for pid in $(pgrep -f -- "$pat"); do
  [ "$pid" = "$PPID" ] || exit 0
done
exit 1
"#;

/// `<pid>\t<path>` from the last non-empty line of the launch reply.
fn parse_reply(stdout: &str) -> Option<(u32, PathBuf)> {
    let line = stdout.lines().rev().find(|l| !l.trim().is_empty())?;
    let (pid, path) = line.split_once('\t')?;
    let pid = pid.trim().parse::<u32>().ok().filter(|p| *p > 0)?;
    let path = path.trim_end();
    if path.is_empty() {
        return None;
    }
    Some((pid, PathBuf::from(path)))
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
