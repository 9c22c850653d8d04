//! Quiz score submissions.

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;

/// One completed quiz attempt. Scores are append-only history.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    #[validate(range(min = 1, message = "experimentNo must be a positive integer"))]
    pub experiment_no: i32,
    #[validate(range(min = 0, message = "score must not be negative"))]
    pub score: i32,
    #[validate(range(min = 1, message = "totalQuestions must be at least 1"))]
    pub total_questions: i32,
    /// Average seconds spent per question.
    #[validate(range(min = 0.0, message = "timePerQuestion must not be negative"))]
    pub time_per_question: f64,
}

impl QuizSubmission {
    /// Field checks plus the cross-field rule `score <= totalQuestions`.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()?;
        if self.score > self.total_questions {
            return Err(CoreError::Validation(
                "score cannot exceed totalQuestions".into(),
            ));
        }
        if !self.time_per_question.is_finite() {
            return Err(CoreError::Validation(
                "timePerQuestion must be a finite number".into(),
            ));
        }
        Ok(())
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

    fn submission(score: i32, total: i32, time: f64) -> QuizSubmission {
        QuizSubmission {
            experiment_no: 3,
            score,
            total_questions: total,
            time_per_question: time,
        }
    }

    #[test]
    fn deserializes_camel_case() {
        let input: QuizSubmission = serde_json::from_value(json!({
            "experimentNo": 3,
            "score": 7,
            "totalQuestions": 10,
            "timePerQuestion": 12.5
        }))
        .expect("deserialize");
        assert!(input.check().is_ok());
        assert_eq!(input.total_questions, 10);
    }

    #[test]
    fn perfect_and_zero_scores_are_valid() {
        assert!(submission(10, 10, 0.0).check().is_ok());
        assert!(submission(0, 10, 4.2).check().is_ok());
    }

    #[test]
    fn score_above_total_is_rejected() {
        assert_matches!(
            submission(11, 10, 1.0).check(),
            Err(CoreError::Validation(msg)) if msg.contains("exceed")
        );
    }

    #[test]
    fn field_ranges_are_enforced() {
        assert!(submission(-1, 10, 1.0).check().is_err());
        assert!(submission(0, 0, 1.0).check().is_err());
        assert!(submission(1, 10, -0.5).check().is_err());
    }
}
