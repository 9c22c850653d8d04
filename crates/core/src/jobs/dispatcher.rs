//! Job dispatch: one external process per request.
//!
//! [`JobDispatcher`] owns the resolved [`Interpreter`] and an optional
//! timeout. Callers describe a job as a [`JobRequest`] and get back an
//! [`Outcome`]; [`JobDispatcher::spawn`] runs the job on its own Tokio task
//! and hands back a [`JobHandle`] to await.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::process::Command;
use tokio::task::JoinHandle;

use super::interpreter::Interpreter;
use super::subprocess::{self, SubprocessError};

/// How output on stderr affects the verdict of a job that exited zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StderrPolicy {
    /// Any stderr output fails the job.
    #[default]
    Strict,
    /// stderr is logged and ignored; only the exit status decides.
    Tolerate,
}

/// A single external job: the script to run, its positional arguments and
/// an optional payload for stdin.
///
/// Arguments are handed to the OS as a vector; no shell ever sees them, so
/// free text needs no quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub script: PathBuf,
    pub args: Vec<String>,
    pub stdin: Option<String>,
    pub stderr: StderrPolicy,
}

impl JobRequest {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            args: Vec::new(),
            stdin: None,
            stderr: StderrPolicy::Strict,
        }
    }

    /// Append one positional argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Supply a payload to be written to the script's stdin.
    pub fn stdin(mut self, payload: impl Into<String>) -> Self {
        self.stdin = Some(payload.into());
        self
    }

    /// Judge the job on its exit status alone, for scripts that log
    /// progress to stderr.
    pub fn tolerate_stderr(mut self) -> Self {
        self.stderr = StderrPolicy::Tolerate;
        self
    }

    /// Script file name, for log fields.
    pub fn script_name(&self) -> String {
        self.script
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.script.display().to_string())
    }
}

/// Why a job is considered failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The process could not be started or waited on.
    Invocation,
    /// The process exited non-zero or was killed by a signal.
    NonZeroExit,
    /// The process exited zero but wrote to stderr.
    Diagnostics,
    /// The process exceeded the dispatcher timeout and was killed.
    Timeout,
}

/// Terminal state of a failed job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub kind: FailureKind,
    /// Exit code when the process ran to completion with one.
    pub exit_code: Option<i32>,
    /// Everything the process wrote to stderr, verbatim.
    pub stderr: String,
    /// Invocation or timeout message when no process output explains the failure.
    pub message: Option<String>,
}

impl JobFailure {
    /// The most specific diagnostic available: stderr if the process wrote
    /// any, otherwise the invocation error message.
    pub fn diagnostic(&self) -> String {
        if !self.stderr.is_empty() {
            return self.stderr.clone();
        }
        match (&self.message, self.exit_code) {
            (Some(message), _) => message.clone(),
            (None, Some(code)) => format!("Process exited with code {code}"),
            (None, None) => "Process terminated by signal".to_string(),
        }
    }
}

/// Result of running a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { stdout: String },
    Failure(JobFailure),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// Launches external jobs through a fixed interpreter.
///
/// Cheap to clone; clones share the interpreter.
#[derive(Debug, Clone)]
pub struct JobDispatcher {
    interpreter: Arc<Interpreter>,
    timeout: Option<Duration>,
}

impl JobDispatcher {
    /// Create a dispatcher for `interpreter`. `timeout` of `None` waits for
    /// the process indefinitely.
    pub fn new(interpreter: Interpreter, timeout: Option<Duration>) -> Self {
        Self {
            interpreter: Arc::new(interpreter),
            timeout,
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run `request` to completion on the current task.
    ///
    /// Failure is decided before stdout is looked at: a spawn/wait error,
    /// a timeout, a non-zero (or missing) exit code, or any stderr output
    /// each independently yield [`Outcome::Failure`]. Under
    /// [`StderrPolicy::Tolerate`] stderr is only logged.
    pub async fn run(&self, request: JobRequest) -> Outcome {
        let script_name = request.script_name();
        let mut cmd = Command::new(self.interpreter.path());
        cmd.arg(&request.script).args(&request.args);

        tracing::debug!(
            interpreter = %self.interpreter,
            script = %script_name,
            arg_count = request.args.len(),
            has_stdin = request.stdin.is_some(),
            "Dispatching job"
        );

        let payload = request.stdin.as_deref().map(str::as_bytes);
        let capture = match subprocess::run_command(&mut cmd, payload, self.timeout).await {
            Ok(capture) => capture,
            Err(SubprocessError::Io(e)) => {
                tracing::error!(script = %script_name, error = %e, "Job invocation failed");
                return Outcome::Failure(JobFailure {
                    kind: FailureKind::Invocation,
                    exit_code: None,
                    stderr: String::new(),
                    message: Some(e.to_string()),
                });
            }
            Err(e @ SubprocessError::Timeout { .. }) => {
                tracing::error!(script = %script_name, error = %e, "Job timed out");
                return Outcome::Failure(JobFailure {
                    kind: FailureKind::Timeout,
                    exit_code: None,
                    stderr: String::new(),
                    message: Some(e.to_string()),
                });
            }
        };

        let kind = match (capture.exit_code, request.stderr) {
            (Some(0), _) if capture.stderr.is_empty() => None,
            (Some(0), StderrPolicy::Tolerate) => {
                tracing::debug!(script = %script_name, stderr = %capture.stderr, "Job wrote to stderr");
                None
            }
            (Some(0), StderrPolicy::Strict) => Some(FailureKind::Diagnostics),
            _ => Some(FailureKind::NonZeroExit),
        };

        match kind {
            None => {
                tracing::info!(
                    script = %script_name,
                    duration_ms = capture.duration_ms,
                    stdout_bytes = capture.stdout.len(),
                    "Job completed"
                );
                Outcome::Success {
                    stdout: capture.stdout,
                }
            }
            Some(kind) => {
                tracing::warn!(
                    script = %script_name,
                    ?kind,
                    exit_code = ?capture.exit_code,
                    duration_ms = capture.duration_ms,
                    "Job failed"
                );
                Outcome::Failure(JobFailure {
                    kind,
                    exit_code: capture.exit_code,
                    stderr: capture.stderr,
                    message: None,
                })
            }
        }
    }

    /// Run `request` on a new Tokio task and return a handle to its outcome.
    pub fn spawn(&self, request: JobRequest) -> JobHandle {
        let dispatcher = self.clone();
        JobHandle {
            inner: tokio::spawn(async move { dispatcher.run(request).await }),
        }
    }
}

/// Future resolving to the [`Outcome`] of a spawned job.
///
/// A panicked or aborted job task resolves to an invocation failure rather
/// than propagating the panic into the caller. Dropping the handle before
/// completion aborts the task, which kills the child process.
#[derive(Debug)]
pub struct JobHandle {
    inner: JoinHandle<Outcome>,
}

impl Drop for JobHandle {
    fn drop(&mut self) {
        self.inner.abort();
    }
}

impl Future for JobHandle {
    type Output = Outcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx).map(|joined| {
            joined.unwrap_or_else(|e| {
                Outcome::Failure(JobFailure {
                    kind: FailureKind::Invocation,
                    exit_code: None,
                    stderr: String::new(),
                    message: Some(format!("Job task failed: {e}")),
                })
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
