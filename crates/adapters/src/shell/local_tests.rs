// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const T: Duration = Duration::from_secs(5);

#[tokio::test]
async fn captures_stdout_stderr_and_code() {
    let shell = LocalShell::new();
    let out = shell.run("echo out; echo err >&2; exit 3", None, T).await.unwrap();
    assert_eq!(out.code, 3);
    assert_eq!(out.stdout, "out\n");
    assert_eq!(out.stderr, "err\n");
    assert!(!out.success());
}

#[tokio::test]
async fn feeds_stdin() {
    let shell = LocalShell::new();
    let out = shell.run("cat", Some(b"{\"pid\": 1}"), T).await.unwrap();
    assert_eq!(out.stdout, "{\"pid\": 1}");
}

#[tokio::test]
async fn script_ignoring_stdin_still_completes() {
    let shell = LocalShell::new();
    let big = vec![b'x'; 1 << 20];
    let out = shell.run("true", Some(&big), T).await.unwrap();
    assert!(out.success());
}

#[tokio::test]
async fn run_checked_turns_nonzero_exit_into_failure() {
    let shell = LocalShell::new();
    let err = shell.run_checked("echo nope >&2; exit 127", None, T).await.unwrap_err();
    match err {
        ShellError::Failed { code, stderr, .. } => {
            assert_eq!(code, 127);
            assert_eq!(stderr, "nope");
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_script_times_out() {
    let shell = LocalShell::new();
    let started = std::time::Instant::now();
    let err = shell.run("sleep 5", None, Duration::from_millis(100)).await.unwrap_err();
    assert!(matches!(err, ShellError::Timeout { .. }));
    assert!(err.is_connection());
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn backgrounded_process_with_redirects_does_not_block() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("bg.log");
    let script = format!(
        "nohup sh -c 'sleep 2' > {} 2>&1 < /dev/null & echo $!",
        dlg_core::shell_quote(&log.to_string_lossy())
    );
    let started = std::time::Instant::now();
    let out = LocalShell::new().run(&script, None, T).await.unwrap();
    assert!(out.stdout.trim().parse::<u32>().is_ok());
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn path_prepend_is_visible_to_script() {
    let shell = LocalShell::new().with_path_prepend(vec!["/opt/dlg-test/bin".into()]);
    let out = shell.run("printf %s \"$PATH\"", None, T).await.unwrap();
    assert!(out.stdout.starts_with("/opt/dlg-test/bin:"));
}

#[test]
fn host_is_local() {
    assert_eq!(LocalShell::new().host(), "local");
}
