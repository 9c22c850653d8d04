//! Experiment feedback submissions.

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;

/// Lowest accepted rating.
pub const MIN_RATING: i16 = 1;
/// Highest accepted rating.
pub const MAX_RATING: i16 = 5;

/// Longest accepted free-text field (characters).
pub const MAX_TEXT_LEN: u64 = 5000;

/// A user's feedback on one experiment. Ratings are 1 to 5 inclusive;
/// `comments` and `suggestions` default to empty strings.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    #[validate(range(min = 1, message = "experimentNo must be a positive integer"))]
    pub experiment_no: i32,
    #[validate(range(min = MIN_RATING, max = MAX_RATING, message = "understanding must be between 1 and 5"))]
    pub understanding: i16,
    #[validate(range(min = MIN_RATING, max = MAX_RATING, message = "difficulty must be between 1 and 5"))]
    pub difficulty: i16,
    #[validate(range(min = MIN_RATING, max = MAX_RATING, message = "usefulness must be between 1 and 5"))]
    pub usefulness: i16,
    #[serde(default)]
    #[validate(length(max = MAX_TEXT_LEN, message = "comments must be at most 5000 characters"))]
    pub comments: String,
    #[serde(default)]
    #[validate(length(max = MAX_TEXT_LEN, message = "suggestions must be at most 5000 characters"))]
    pub suggestions: String,
}

impl FeedbackSubmission {
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate().map_err(CoreError::from)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> FeedbackSubmission {
        serde_json::from_value(value).expect("deserialize")
    }

    #[test]
    fn text_fields_default_to_empty() {
        let input = parse(json!({
            "experimentNo": 2,
            "understanding": 4,
            "difficulty": 3,
            "usefulness": 5
        }));
        assert!(input.check().is_ok());
        assert_eq!(input.comments, "");
        assert_eq!(input.suggestions, "");
    }

    #[test]
    fn ratings_outside_bounds_are_rejected() {
        let input = parse(json!({
            "experimentNo": 2,
            "understanding": 0,
            "difficulty": 6,
            "usefulness": 5
        }));
        let err = input.check().unwrap_err();
        assert_matches!(
            err,
            CoreError::Validation(msg)
                if msg == "difficulty must be between 1 and 5; understanding must be between 1 and 5"
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        for rating in [MIN_RATING, MAX_RATING] {
            let input = parse(json!({
                "experimentNo": 1,
                "understanding": rating,
                "difficulty": rating,
                "usefulness": rating
            }));
            assert!(input.check().is_ok());
        }
    }

    #[test]
    fn overlong_comment_is_rejected() {
        let input = parse(json!({
            "experimentNo": 1,
            "understanding": 3,
            "difficulty": 3,
            "usefulness": 3,
            "comments": "x".repeat(MAX_TEXT_LEN as usize + 1)
        }));
        assert_matches!(input.check(), Err(CoreError::Validation(msg)) if msg.contains("comments"));
    }

    #[test]
    fn limits_follow_the_declared_constants() {
        for rating in [MIN_RATING - 1, MAX_RATING + 1] {
            let input = parse(json!({
                "experimentNo": 1,
                "understanding": rating,
                "difficulty": 3,
                "usefulness": 3
            }));
            assert_matches!(input.check(), Err(CoreError::Validation(msg)) if msg.contains("understanding"));
        }

        let input = parse(json!({
            "experimentNo": 1,
            "understanding": 3,
            "difficulty": 3,
            "usefulness": 3,
            "suggestions": "x".repeat(MAX_TEXT_LEN as usize)
        }));
        assert!(input.check().is_ok());
    }
}
