//! Quiz score model.

use serde::Serialize;
use sqlx::FromRow;
use vlab_core::types::{DbId, Timestamp};

/// One quiz attempt. Rows are never updated after insert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizScore {
    pub id: DbId,
    pub user_id: DbId,
    pub experiment_no: i32,
    pub score: i32,
    pub total_questions: i32,
    pub time_per_question: f64,
    pub completed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
