//! Caller-facing result envelope for external jobs.
//!
//! Every job ends in exactly one of four shapes, discriminated by the
//! `status` field so clients never have to match on message text:
//!
//! ```text
//! {"status": "success",          "message": "...", "output": {...}}
//! {"status": "execution_failed", "error": "...",   "details": "...", "exit_code": 1}
//! {"status": "empty_output",     "error": "..."}
//! {"status": "invalid_output",   "error": "...",   "reason": "...", "raw": "..."}
//! ```

use serde::Serialize;
use serde_json::Value;

use super::dispatcher::{JobFailure, Outcome};
use super::extract::{extract, ExtractError, ExtractPolicy};

pub const EXECUTION_FAILED_ERROR: &str = "Script execution failed";
pub const EMPTY_OUTPUT_ERROR: &str = "Script returned empty output";
pub const INVALID_OUTPUT_ERROR: &str = "Invalid JSON output from script";

/// Placeholder substituted for diagnostics when they are not exposed.
pub const REDACTED: &str = "[redacted]";

/// Uniform job response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Envelope {
    Success {
        message: String,
        output: Value,
    },
    ExecutionFailed {
        error: String,
        details: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        exit_code: Option<i32>,
    },
    EmptyOutput {
        error: String,
    },
    InvalidOutput {
        error: String,
        reason: String,
        raw: String,
    },
}

impl Envelope {
    /// Fold a dispatcher [`Outcome`] into an envelope.
    ///
    /// Failures short-circuit: stdout of a failed job is never parsed.
    /// Successful stdout goes through [`extract`] under `policy`, and
    /// `success_message` is attached to the parsed payload.
    pub fn build(outcome: Outcome, policy: ExtractPolicy, success_message: &str) -> Self {
        match outcome {
            Outcome::Failure(failure) => Self::from_failure(&failure),
            Outcome::Success { stdout } => match extract(&stdout, policy) {
                Ok(output) => Envelope::Success {
                    message: success_message.to_string(),
                    output,
                },
                Err(err) => Self::from_extract_error(err),
            },
        }
    }

    pub fn from_failure(failure: &JobFailure) -> Self {
        Envelope::ExecutionFailed {
            error: EXECUTION_FAILED_ERROR.to_string(),
            details: failure.diagnostic(),
            exit_code: failure.exit_code,
        }
    }

    pub fn from_extract_error(err: ExtractError) -> Self {
        let reason = err.reason().to_string();
        match err {
            ExtractError::EmptyOutput => Envelope::EmptyOutput {
                error: EMPTY_OUTPUT_ERROR.to_string(),
            },
            ExtractError::NoPayload { raw }
            | ExtractError::Malformed { raw, .. }
            | ExtractError::TooLarge { raw, .. } => Envelope::InvalidOutput {
                error: INVALID_OUTPUT_ERROR.to_string(),
                reason,
                raw,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }

    /// Stable discriminant, identical to the serialized `status` field.
    pub fn status(&self) -> &'static str {
        match self {
            Envelope::Success { .. } => "success",
            Envelope::ExecutionFailed { .. } => "execution_failed",
            Envelope::EmptyOutput { .. } => "empty_output",
            Envelope::InvalidOutput { .. } => "invalid_output",
        }
    }

    /// Replace process diagnostics (stderr, raw stdout) with [`REDACTED`].
    ///
    /// The shape is unchanged so clients still discriminate on `status`.
    pub fn redacted(self) -> Self {
        match self {
            Envelope::ExecutionFailed {
                error, exit_code, ..
            } => Envelope::ExecutionFailed {
                error,
                details: REDACTED.to_string(),
                exit_code,
            },
            Envelope::InvalidOutput { error, reason, .. } => Envelope::InvalidOutput {
                error,
                reason,
                raw: REDACTED.to_string(),
            },
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
