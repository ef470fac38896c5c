// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers: an isolated sandbox directory and a fluent wrapper over
//! `assert_cmd` for running `dlg` inside it.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// `dlg` with no config file and colors off.
pub fn cli() -> Cli {
    let sandbox = Sandbox::empty();
    let mut cli = sandbox.dlg();
    cli._sandbox = Some(sandbox);
    cli
}

/// A temporary directory used as `$HOME` and config location.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write a file relative to the sandbox, creating parent directories.
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Write the default config file (`$XDG_CONFIG_HOME/dlg/config.toml`).
    pub fn config(&self, toml: &str) -> PathBuf {
        self.file(".config/dlg/config.toml", toml)
    }

    pub fn dlg(&self) -> Cli {
        let mut cmd = Command::cargo_bin("dlg").unwrap();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.join(".config"))
            .env("NO_COLOR", "1")
            .env_remove("DLG_CONFIG")
            .env_remove("DLG_LOG")
            .env_remove("COLOR");
        Cli { cmd, _sandbox: None }
    }
}

pub struct Cli {
    cmd: Command,
    /// Keeps an owned sandbox (and its working directory) alive while the command runs.
    _sandbox: Option<Sandbox>,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    fn run(mut self) -> Run {
        let output = self.cmd.output().unwrap();
        Run {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn passes(self) -> Run {
        self.exits(0)
    }

    pub fn exits(self, code: i32) -> Run {
        let run = self.run();
        assert_eq!(
            run.code,
            Some(code),
            "expected exit {code}\nstdout:\n{}\nstderr:\n{}",
            run.stdout,
            run.stderr
        );
        run
    }
}

pub struct Run {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl Run {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}:\n{}", self.stderr);
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap()
    }
}
