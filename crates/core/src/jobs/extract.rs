//! JSON payload extraction from raw process output.
//!
//! Analysis scripts are expected to print one JSON object, but nothing
//! stops them from printing banners or warnings to the same stream.
//! [`ExtractPolicy::Lenient`] tolerates that by parsing only the widest
//! `{ ... }` span; it is a best-effort shim, not a general JSON-in-text
//! parser, and refuses to scan inputs above [`MAX_SCAN_BYTES`].

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Largest raw output the lenient policy will scan (10 MiB).
pub const MAX_SCAN_BYTES: usize = 10 * 1024 * 1024;

/// First `{` through last `}` across lines.
static BRACE_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// How strictly stdout must conform to "just JSON".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractPolicy {
    /// The whole output (surrounding whitespace aside) must be JSON.
    Strict,
    /// The widest brace-delimited span is parsed; noise around it is ignored.
    Lenient,
}

/// Reasons stdout could not be turned into a JSON payload.
///
/// Every variant that saw non-empty output keeps it verbatim in `raw`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("output is empty")]
    EmptyOutput,

    #[error("no JSON payload found")]
    NoPayload { raw: String },

    #[error("malformed JSON: {message}")]
    Malformed { raw: String, message: String },

    #[error("output of {len} bytes exceeds the {limit} byte scan limit")]
    TooLarge { raw: String, len: usize, limit: usize },
}

impl ExtractError {
    /// Short machine-stable reason string.
    pub fn reason(&self) -> &'static str {
        match self {
            ExtractError::EmptyOutput => "empty output",
            ExtractError::NoPayload { .. } => "no JSON payload found",
            ExtractError::Malformed { .. } => "malformed JSON",
            ExtractError::TooLarge { .. } => "output too large",
        }
    }

    /// The unmodified output, when there was any.
    pub fn raw(&self) -> Option<&str> {
        match self {
            ExtractError::EmptyOutput => None,
            ExtractError::NoPayload { raw }
            | ExtractError::Malformed { raw, .. }
            | ExtractError::TooLarge { raw, .. } => Some(raw),
        }
    }
}

/// Extract the JSON payload from `raw` under `policy`.
///
/// Whitespace-only output is always [`ExtractError::EmptyOutput`], checked
/// before any parsing.
pub fn extract(raw: &str, policy: ExtractPolicy) -> Result<Value, ExtractError> {
    if raw.trim().is_empty() {
        return Err(ExtractError::EmptyOutput);
    }

    let candidate = match policy {
        ExtractPolicy::Strict => raw.trim(),
        ExtractPolicy::Lenient => {
            if raw.len() > MAX_SCAN_BYTES {
                return Err(ExtractError::TooLarge {
                    raw: raw.to_string(),
                    len: raw.len(),
                    limit: MAX_SCAN_BYTES,
                });
            }
            BRACE_SPAN_RE
                .find(raw)
                .map(|m| m.as_str())
                .ok_or_else(|| ExtractError::NoPayload {
                    raw: raw.to_string(),
                })?
        }
    };

    serde_json::from_str(candidate).map_err(|e| ExtractError::Malformed {
        raw: raw.to_string(),
        message: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
