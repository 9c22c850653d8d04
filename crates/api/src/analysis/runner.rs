//! Runs one analysis script for one request and folds the result into an
//! [`Envelope`].
//!
//! Held in [`AppState`](crate::state::AppState) behind an `Arc`. Handlers
//! validate their input first, then describe the job as an [`AnalysisJob`];
//! the runner resolves the script, dispatches it, parses stdout and applies
//! the diagnostics policy.

use std::path::{Path, PathBuf};

use vlab_core::jobs::dispatcher::{JobDispatcher, JobRequest, StderrPolicy};
use vlab_core::jobs::envelope::Envelope;
use vlab_core::jobs::extract::ExtractPolicy;

/// Description of a single script invocation.
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub script: &'static str,
    pub args: Vec<String>,
    pub stdin: Option<String>,
    pub policy: ExtractPolicy,
    pub stderr: StderrPolicy,
    /// `message` of the success envelope.
    pub success_message: &'static str,
}

impl AnalysisJob {
    /// A job with strict JSON extraction and no arguments.
    pub fn new(script: &'static str, success_message: &'static str) -> Self {
        Self {
            script,
            args: Vec::new(),
            stdin: None,
            policy: ExtractPolicy::Strict,
            stderr: StderrPolicy::Strict,
            success_message,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn stdin(mut self, payload: impl Into<String>) -> Self {
        self.stdin = Some(payload.into());
        self
    }

    /// Recover JSON embedded in noisy stdout.
    pub fn lenient(mut self) -> Self {
        self.policy = ExtractPolicy::Lenient;
        self
    }

    /// Ignore stderr output; only a non-zero exit fails the job.
    pub fn tolerate_stderr(mut self) -> Self {
        self.stderr = StderrPolicy::Tolerate;
        self
    }
}

pub struct AnalysisRunner {
    dispatcher: JobDispatcher,
    scripts_dir: PathBuf,
    expose_diagnostics: bool,
}

impl AnalysisRunner {
    pub fn new(dispatcher: JobDispatcher, scripts_dir: PathBuf, expose_diagnostics: bool) -> Self {
        Self {
            dispatcher,
            scripts_dir,
            expose_diagnostics,
        }
    }

    pub fn dispatcher(&self) -> &JobDispatcher {
        &self.dispatcher
    }

    pub fn scripts_dir(&self) -> &Path {
        &self.scripts_dir
    }

    /// Run `job` to completion. Never fails: every outcome is an envelope.
    pub async fn run(&self, job: AnalysisJob) -> Envelope {
        let AnalysisJob {
            script,
            args,
            stdin,
            policy,
            stderr,
            success_message,
        } = job;

        let mut request = args
            .into_iter()
            .fold(JobRequest::new(self.scripts_dir.join(script)), |req, arg| {
                req.arg(arg)
            });
        if let Some(payload) = stdin {
            request = request.stdin(payload);
        }
        if stderr == StderrPolicy::Tolerate {
            request = request.tolerate_stderr();
        }

        let outcome = self.dispatcher.spawn(request).await;
        let envelope = Envelope::build(outcome, policy, success_message);

        if envelope.is_success() {
            tracing::info!(script, "Analysis job succeeded");
        } else {
            tracing::warn!(script, status = envelope.status(), "Analysis job failed");
        }

        if self.expose_diagnostics {
            envelope
        } else {
            envelope.redacted()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use vlab_core::jobs::envelope::REDACTED;
    use vlab_core::jobs::interpreter::Interpreter;

    use super::*;

    fn runner_with(scripts: &[(&str, &str)], expose: bool) -> (tempfile::TempDir, AnalysisRunner) {
        let dir = tempfile::tempdir().expect("tempdir");
        for (name, body) in scripts {
            std::fs::write(dir.path().join(name), body).expect("write script");
        }
        let dispatcher = JobDispatcher::new(Interpreter::fixed("bash"), Some(Duration::from_secs(10)));
        let runner = AnalysisRunner::new(dispatcher, dir.path().to_path_buf(), expose);
        (dir, runner)
    }

    #[tokio::test]
    async fn resolves_script_in_scripts_dir_and_passes_args() {
        let (_dir, runner) = runner_with(
            &[("echo.py", "printf '{\"args\": [\"%s\", \"%s\"]}' \"$1\" \"$2\"\n")],
            true,
        );
        let envelope = runner
            .run(AnalysisJob::new("echo.py", "Analysis complete").arg("a.csv").arg("5"))
            .await;
        assert_eq!(
            envelope,
            Envelope::Success {
                message: "Analysis complete".to_string(),
                output: json!({"args": ["a.csv", "5"]}),
            }
        );
    }

    #[tokio::test]
    async fn stdin_payload_reaches_script() {
        let (_dir, runner) = runner_with(&[("cat.py", "cat\n")], true);
        let envelope = runner
            .run(AnalysisJob::new("cat.py", "done").stdin("[{\"text\":\"hi\"}]"))
            .await;
        assert_matches::assert_matches!(envelope, Envelope::Success { output, .. } if output == json!([{"text": "hi"}]));
    }

    #[tokio::test]
    async fn lenient_jobs_recover_noisy_output() {
        let (_dir, runner) = runner_with(&[("noisy.py", "echo 'loading model'\necho '{\"topics\": []}'\n")], true);
        let strict = runner.run(AnalysisJob::new("noisy.py", "done")).await;
        assert_eq!(strict.status(), "invalid_output");

        let lenient = runner.run(AnalysisJob::new("noisy.py", "done").lenient()).await;
        assert!(lenient.is_success());
    }

    #[tokio::test]
    async fn stderr_tolerance_is_per_job() {
        let (_dir, runner) = runner_with(&[("chatty.py", "echo 'started' >&2\necho '{\"data\": []}'\n")], true);
        let strict = runner.run(AnalysisJob::new("chatty.py", "done")).await;
        assert_eq!(strict.status(), "execution_failed");

        let tolerant = runner.run(AnalysisJob::new("chatty.py", "done").tolerate_stderr()).await;
        assert_eq!(
            tolerant,
            Envelope::Success {
                message: "done".to_string(),
                output: json!({"data": []}),
            }
        );
    }

    #[tokio::test]
    async fn diagnostics_are_redacted_when_disabled() {
        let (_dir, runner) = runner_with(&[("fail.py", "echo 'secret path /srv/x' >&2\nexit 3\n")], false);
        let envelope = runner.run(AnalysisJob::new("fail.py", "done")).await;
        assert_eq!(
            envelope,
            Envelope::ExecutionFailed {
                error: vlab_core::jobs::envelope::EXECUTION_FAILED_ERROR.to_string(),
                details: REDACTED.to_string(),
                exit_code: Some(3),
            }
        );
    }

    #[tokio::test]
    async fn missing_script_is_execution_failure() {
        let (_dir, runner) = runner_with(&[], true);
        let envelope = runner.run(AnalysisJob::new("absent.py", "done")).await;
        assert_eq!(envelope.status(), "execution_failed");
    }
}
