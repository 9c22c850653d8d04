//! Sentiment analysis request validation.
//!
//! All checks here run before any process is spawned: a request that fails
//! validation never reaches the dispatcher.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::CoreError;

/// Script for single-file (CSV) sentiment analysis.
pub const SCRIPT_CSV: &str = "sentiment_analysis.py";
/// Script for a single free-text input passed as an argument.
pub const SCRIPT_TEXT: &str = "sentiment_analysis_text.py";
/// Script for many entries passed as a JSON array on stdin.
pub const SCRIPT_MULTI: &str = "sentiment_analysis_multi.py";

/// Largest free-text input accepted as a single process argument (bytes).
///
/// Linux caps a single argv string at 128 KiB; stay well under it.
pub const MAX_TEXT_BYTES: usize = 64 * 1024;

/// Ground-truth label attached to a multi-entry item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or(())
    }
}

/// Label of a multi-entry item as forwarded to the script.
///
/// An empty string is passed through as `""`; the script still computes
/// metrics for it, unlike a missing label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryLabel {
    Blank,
    Known(SentimentLabel),
}

impl Serialize for EntryLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EntryLabel::Blank => serializer.serialize_str(""),
            EntryLabel::Known(label) => serializer.serialize_str(label.as_str()),
        }
    }
}

/// One validated multi-entry item, in the shape the script reads from stdin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentimentEntry {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<EntryLabel>,
}

/// Validate the `data` field of a multi-entry request.
///
/// `data` must be a non-empty array; each entry needs a non-blank string `text`, and
/// an optional `label` that, when present, must be empty or one of the three
/// known labels. Entry numbers in messages are 1-based.
pub fn validate_entries(data: Option<&Value>) -> Result<Vec<SentimentEntry>, CoreError> {
    let items = data.and_then(Value::as_array).ok_or_else(|| {
        CoreError::Validation("Invalid input. Expected an array of text entries.".into())
    })?;

    if items.is_empty() {
        return Err(CoreError::Validation(
            "Invalid input. Expected at least one text entry.".into(),
        ));
    }

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| validate_entry(idx + 1, item))
        .collect()
}

fn validate_entry(number: usize, item: &Value) -> Result<SentimentEntry, CoreError> {
    let text = item
        .get("text")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Entry {number} is missing a valid 'text' field."
            ))
        })?;

    let label = match item.get("label") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => Some(EntryLabel::Blank),
        Some(Value::String(s)) => Some(EntryLabel::Known(
            s.parse::<SentimentLabel>()
                .map_err(|()| invalid_label(number))?,
        )),
        Some(_) => return Err(invalid_label(number)),
    };

    Ok(SentimentEntry {
        text: text.to_string(),
        label,
    })
}

fn invalid_label(number: usize) -> CoreError {
    CoreError::Validation(format!(
        "Invalid label at entry {number}. Must be 'positive', 'neutral', or 'negative'."
    ))
}

/// Validate a single free-text input destined for a process argument.
pub fn validate_text(text: Option<&str>) -> Result<&str, CoreError> {
    let text = text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| CoreError::Validation("No text provided".into()))?;

    if text.len() > MAX_TEXT_BYTES {
        return Err(CoreError::Validation(format!(
            "Text exceeds the maximum of {MAX_TEXT_BYTES} bytes"
        )));
    }
    // The OS rejects NUL bytes inside argv strings.
    if text.contains('\0') {
        return Err(CoreError::Validation(
            "Text must not contain NUL characters".into(),
        ));
    }
    Ok(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
