//! Experiment feedback model.

use serde::Serialize;
use sqlx::FromRow;
use vlab_core::types::{DbId, Timestamp};

/// A row from the `feedbacks` table. One per (user, experiment).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feedback {
    pub id: DbId,
    pub user_id: DbId,
    pub experiment_no: i32,
    pub understanding: i16,
    pub difficulty: i16,
    pub usefulness: i16,
    pub comments: String,
    pub suggestions: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of an upsert: the stored row plus whether it was newly inserted.
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackUpsert {
    #[sqlx(flatten)]
    pub feedback: Feedback,
    pub created: bool,
}

/// Feedback joined with the submitting user's name and email (admin view).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeedbackWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub feedback: Feedback,
    pub user_name: String,
    pub user_email: String,
}
