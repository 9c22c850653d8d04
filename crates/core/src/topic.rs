//! Topic modeling request parameters.

use serde_json::Value;

use crate::error::CoreError;

/// Script invoked as `topic_modeling.py <csv_path> <num_topics>`.
pub const SCRIPT: &str = "topic_modeling.py";

/// Topic count used when the request does not name one.
pub const DEFAULT_NUM_TOPICS: u32 = 5;

/// Upper bound on the requested topic count.
pub const MAX_NUM_TOPICS: u32 = 50;

/// Parse the `numTopics` request field.
///
/// Accepts a JSON number or a numeric string (multipart forms only carry
/// strings). Missing, `null` and empty values fall back to
/// [`DEFAULT_NUM_TOPICS`].
pub fn parse_num_topics(raw: Option<&Value>) -> Result<u32, CoreError> {
    let parsed = match raw {
        None | Some(Value::Null) => return Ok(DEFAULT_NUM_TOPICS),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(DEFAULT_NUM_TOPICS),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(_) => None,
    };

    match parsed {
        Some(n) if (1..=MAX_NUM_TOPICS).contains(&n) => Ok(n),
        _ => Err(CoreError::Validation(format!(
            "numTopics must be an integer between 1 and {MAX_NUM_TOPICS}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_when_absent() {
        assert_eq!(parse_num_topics(None).unwrap(), DEFAULT_NUM_TOPICS);
        assert_eq!(parse_num_topics(Some(&json!(null))).unwrap(), DEFAULT_NUM_TOPICS);
        assert_eq!(parse_num_topics(Some(&json!(""))).unwrap(), DEFAULT_NUM_TOPICS);
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_num_topics(Some(&json!(3))).unwrap(), 3);
        assert_eq!(parse_num_topics(Some(&json!(" 12 "))).unwrap(), 12);
        assert_eq!(parse_num_topics(Some(&json!(MAX_NUM_TOPICS))).unwrap(), MAX_NUM_TOPICS);
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        for bad in [
            json!(0),
            json!(-2),
            json!(2.5),
            json!(MAX_NUM_TOPICS + 1),
            json!("five"),
            json!("3; rm -rf /"),
            json!([5]),
        ] {
            assert!(parse_num_topics(Some(&bad)).is_err(), "{bad} should be rejected");
        }
    }
}
