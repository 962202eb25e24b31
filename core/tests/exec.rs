#![allow(clippy::expect_used, clippy::unwrap_used)]
#![cfg(unix)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use viridian_core::exec::ExecutionRequest;
use viridian_core::exec::ExecutionResult;
use viridian_core::exec::ExternalExecutor;
use viridian_core::exec::run_via_shell;

#[tokio::test]
async fn echo_captures_stdout() {
    let dir = TempDir::new().unwrap();
    let request = ExecutionRequest::new("echo hello", dir.path());
    let result = run_via_shell(&request).await;
    assert_eq!(
        result,
        ExecutionResult::Completed {
            stdout: "hello\n".to_string(),
            stderr: String::new(),
        }
    );
}

#[tokio::test]
async fn stderr_is_captured_separately() {
    let dir = TempDir::new().unwrap();
    let request = ExecutionRequest::new("echo oops >&2", dir.path());
    let result = run_via_shell(&request).await;
    assert_eq!(
        result,
        ExecutionResult::Completed {
            stdout: String::new(),
            stderr: "oops\n".to_string(),
        }
    );
}

#[tokio::test]
async fn nonzero_exit_is_still_completed() {
    let dir = TempDir::new().unwrap();
    let request = ExecutionRequest::new("false", dir.path());
    let result = run_via_shell(&request).await;
    assert_eq!(
        result,
        ExecutionResult::Completed {
            stdout: String::new(),
            stderr: String::new(),
        }
    );
}

#[tokio::test]
async fn missing_program_reports_the_first_token() {
    let dir = TempDir::new().unwrap();
    let request = ExecutionRequest::new("doesnotexist123 --with args", dir.path());
    let result = run_via_shell(&request).await;
    assert_eq!(
        result,
        ExecutionResult::NotFound {
            program: "doesnotexist123".to_string(),
        }
    );
}

#[tokio::test]
async fn long_commands_time_out() {
    let dir = TempDir::new().unwrap();
    let mut request = ExecutionRequest::new("sleep 5", dir.path());
    request.timeout = Duration::from_millis(200);
    let result = run_via_shell(&request).await;
    assert_eq!(result, ExecutionResult::TimedOut);
}

#[tokio::test]
async fn timeout_discards_partial_output() {
    let dir = TempDir::new().unwrap();
    let mut request = ExecutionRequest::new("echo first; sleep 5", dir.path());
    request.timeout = Duration::from_millis(200);
    let result = run_via_shell(&request).await;
    // Nothing of the already-flushed "first" survives.
    assert_eq!(result, ExecutionResult::TimedOut);
}

#[tokio::test]
async fn commands_run_in_the_requested_directory() {
    let dir = TempDir::new().unwrap();
    let request = ExecutionRequest::new("pwd", dir.path());
    let result = run_via_shell(&request).await;
    let canonical = dir.path().canonicalize().unwrap();
    let expected = format!("{}\n", canonical.display());
    assert_eq!(
        result,
        ExecutionResult::Completed {
            stdout: expected,
            stderr: String::new(),
        }
    );
}

#[tokio::test]
async fn executor_delivers_results_on_the_channel() {
    let dir = TempDir::new().unwrap();
    let (executor, mut rx) = ExternalExecutor::new();
    executor.submit(ExecutionRequest::new("echo queued", dir.path()));
    let result = rx.recv().await.unwrap();
    assert_eq!(
        result,
        ExecutionResult::Completed {
            stdout: "queued\n".to_string(),
            stderr: String::new(),
        }
    );
}
