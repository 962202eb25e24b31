//! External command execution through the host shell.
//!
//! Commands run as tokio tasks; the session owner never blocks on them.
//! Each result is posted to an unbounded channel consumed by whichever
//! thread owns the [`crate::Session`], which is the only place buffer and
//! history are touched.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Child;
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tokio::task::JoinHandle;

/// Hard upper bound on external command runtime.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Exit code shells use for "command not found".
#[cfg(unix)]
const NOT_FOUND_EXIT_CODE: i32 = 127;
#[cfg(windows)]
const NOT_FOUND_EXIT_CODE: i32 = 9009;

/// One submission to the host shell. Immutable once built; dropped when its
/// result has been delivered.
#[derive(Clone, Debug)]
pub struct ExecutionRequest {
    pub command_line: String,
    pub working_dir: PathBuf,
    pub timeout: Duration,
}

impl ExecutionRequest {
    pub fn new(command_line: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command_line: command_line.into(),
            working_dir: working_dir.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// What came back from the worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutionResult {
    /// The process ran to completion; exit codes other than "not found" are
    /// not an error at this layer, the streams speak for themselves.
    Completed { stdout: String, stderr: String },
    /// The timeout elapsed. Partial output is discarded, not reported.
    TimedOut,
    /// The shell could not resolve the leading token as a program.
    NotFound { program: String },
    /// Spawn or wait failed at the OS level.
    Failed { message: String },
}

/// Submits command lines to the host shell and posts each result to the
/// channel handed out at construction.
#[derive(Clone, Debug)]
pub struct ExternalExecutor {
    tx: UnboundedSender<ExecutionResult>,
}

impl ExternalExecutor {
    /// The receiver end belongs to the session owner's event loop.
    pub fn new() -> (Self, UnboundedReceiver<ExecutionResult>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }

    /// Fire-and-forget: the result arrives on the channel. Must be called
    /// from within a tokio runtime.
    pub fn submit(&self, request: ExecutionRequest) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = run_via_shell(&request).await;
            if tx.send(result).is_err() {
                tracing::warn!("execution result dropped: session receiver is gone");
            }
        });
    }
}

/// Runs one command line through the host shell, capturing stdout/stderr,
/// bounded by the request timeout.
pub async fn run_via_shell(request: &ExecutionRequest) -> ExecutionResult {
    let mut command = shell_command(&request.command_line);
    command
        .current_dir(&request.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    command.process_group(0);

    let child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            tracing::warn!("failed to spawn host shell: {err}");
            return ExecutionResult::Failed {
                message: err.to_string(),
            };
        }
    };
    consume_output(child, request).await
}

#[cfg(unix)]
fn shell_command(command_line: &str) -> Command {
    let mut command = Command::new("/bin/sh");
    command.arg("-c").arg(command_line);
    command
}

#[cfg(windows)]
fn shell_command(command_line: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(command_line);
    command
}

async fn consume_output(child: Child, request: &ExecutionRequest) -> ExecutionResult {
    let mut killer = KillOnDrop::new(child);

    // Both pipes were configured above, so `take()` returns `Some`; drain
    // them on their own tasks so the child can never block on a full pipe.
    let Some(stdout_pipe) = killer.child.stdout.take() else {
        return ExecutionResult::Failed {
            message: "stdout pipe was unexpectedly not available".to_string(),
        };
    };
    let Some(stderr_pipe) = killer.child.stderr.take() else {
        return ExecutionResult::Failed {
            message: "stderr pipe was unexpectedly not available".to_string(),
        };
    };
    let stdout_handle = tokio::spawn(read_to_end(stdout_pipe));
    let stderr_handle = tokio::spawn(read_to_end(stderr_pipe));

    match tokio::time::timeout(request.timeout, killer.child.wait()).await {
        Ok(Ok(status)) => {
            // Observed termination; do not re-signal during Drop.
            killer.disarm();
            let stdout = collect(stdout_handle).await;
            let stderr = collect(stderr_handle).await;
            classify(status, stdout, stderr, &request.command_line)
        }
        Ok(Err(err)) => ExecutionResult::Failed {
            message: err.to_string(),
        },
        Err(_) => {
            #[cfg(unix)]
            if let Some(pid) = killer.child.id() {
                // Best-effort kill of the whole process group so children
                // spawned by the shell do not linger.
                unsafe {
                    libc::kill(-(pid as i32), libc::SIGKILL);
                }
            }
            if let Err(err) = killer.child.start_kill() {
                tracing::warn!("failed to kill timed out command: {err}");
            }
            // Abort the readers rather than wait: pipes can stay open if the
            // shell left grandchildren behind. Partial output is dropped.
            stdout_handle.abort();
            stderr_handle.abort();
            ExecutionResult::TimedOut
        }
    }
}

async fn read_to_end<R>(mut reader: R) -> std::io::Result<Vec<u8>>
where
    R: AsyncReadExt + Unpin,
{
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(buf)
}

async fn collect(handle: JoinHandle<std::io::Result<Vec<u8>>>) -> String {
    match handle.await {
        Ok(Ok(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
        _ => String::new(),
    }
}

fn classify(
    status: ExitStatus,
    stdout: String,
    stderr: String,
    command_line: &str,
) -> ExecutionResult {
    if status.code() == Some(NOT_FOUND_EXIT_CODE) {
        let program = command_line
            .split_whitespace()
            .next()
            .unwrap_or(command_line)
            .to_string();
        return ExecutionResult::NotFound { program };
    }
    ExecutionResult::Completed { stdout, stderr }
}

/// Terminates the child if the owning task is dropped before the child has
/// been reaped, e.g. when the runtime shuts down mid-command.
struct KillOnDrop {
    child: Child,
    armed: bool,
}

impl KillOnDrop {
    fn new(child: Child) -> Self {
        Self { child, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.child.start_kill();
        }
    }
}
