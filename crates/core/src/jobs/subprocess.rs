//! Child process mechanics shared by every job.
//!
//! [`run_command`] takes a fully built [`tokio::process::Command`], wires up
//! the pipes, feeds the optional stdin payload, drains stdout and stderr
//! concurrently and waits for exit (optionally bounded by a timeout).

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

/// Maximum stdout or stderr size captured per stream (10 MiB).
///
/// Output beyond this limit is dropped so a runaway script cannot exhaust
/// server memory.
pub const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Everything captured from a process that ran to completion.
#[derive(Debug, Clone)]
pub struct Capture {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
}

/// Errors that prevent a [`Capture`] from being produced.
#[derive(Debug, thiserror::Error)]
pub enum SubprocessError {
    /// Spawning or waiting on the child failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The child outlived its timeout and was killed.
    #[error("Process timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
}

/// Spawn `cmd`, write `stdin_payload` (if any) and close stdin, capture both
/// output streams and wait for exit.
///
/// Output readers are started before the payload is written so a child that
/// produces output while still consuming its input cannot deadlock on a full
/// pipe. When `timeout` elapses the child is killed.
pub async fn run_command(
    cmd: &mut Command,
    stdin_payload: Option<&[u8]>,
    timeout: Option<Duration>,
) -> Result<Capture, SubprocessError> {
    let stdin_mode = if stdin_payload.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    };

    cmd.stdin(stdin_mode)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let start = Instant::now();
    let mut child = cmd.spawn()?;

    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();
    let stdout_task = tokio::spawn(async move { read_stream(stdout_handle).await });
    let stderr_task = tokio::spawn(async move { read_stream(stderr_handle).await });

    if let (Some(payload), Some(mut stdin)) = (stdin_payload, child.stdin.take()) {
        // The child may exit without reading all of its input; that is its
        // business and shows up in the exit status, not here.
        if let Err(e) = stdin.write_all(payload).await {
            tracing::debug!(error = %e, "Child closed stdin before payload was fully written");
        }
        drop(stdin);
    }

    let status = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(waited) => waited?,
            Err(_elapsed) => {
                let _ = child.kill().await;
                return Err(SubprocessError::Timeout {
                    elapsed_ms: start.elapsed().as_millis() as u64,
                });
            }
        },
        None => child.wait().await?,
    };

    let stdout_bytes = stdout_task.await.unwrap_or_default();
    let stderr_bytes = stderr_task.await.unwrap_or_default();

    Ok(Capture {
        stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
        stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
        exit_code: status.code(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Read an entire output stream into a byte buffer, capped at [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h)
            .take(MAX_OUTPUT_BYTES as u64)
            .read_to_end(&mut buf)
            .await;
    }
    buf
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
