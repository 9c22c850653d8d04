//! Repository for the `feedbacks` table.

use sqlx::PgPool;
use vlab_core::feedback::FeedbackSubmission;
use vlab_core::types::DbId;

use crate::models::feedback::{Feedback, FeedbackUpsert, FeedbackWithUser};

const COLUMNS: &str = "id, user_id, experiment_no, understanding, difficulty, usefulness, \
                       comments, suggestions, created_at, updated_at";

pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Create or overwrite the user's feedback for an experiment.
    ///
    /// A single `INSERT ... ON CONFLICT` statement keyed on
    /// `uq_feedbacks_user_experiment`, so concurrent submissions from the
    /// same user collapse into one row. `created` is true when the row was
    /// inserted (`xmax = 0`) rather than updated.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &FeedbackSubmission,
    ) -> Result<FeedbackUpsert, sqlx::Error> {
        let query = format!(
            "INSERT INTO feedbacks
                (user_id, experiment_no, understanding, difficulty, usefulness, comments, suggestions)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT ON CONSTRAINT uq_feedbacks_user_experiment DO UPDATE
             SET understanding = EXCLUDED.understanding,
                 difficulty = EXCLUDED.difficulty,
                 usefulness = EXCLUDED.usefulness,
                 comments = EXCLUDED.comments,
                 suggestions = EXCLUDED.suggestions
             RETURNING {COLUMNS}, (xmax = 0) AS created"
        );
        sqlx::query_as::<_, FeedbackUpsert>(&query)
            .bind(user_id)
            .bind(input.experiment_no)
            .bind(input.understanding)
            .bind(input.difficulty)
            .bind(input.usefulness)
            .bind(&input.comments)
            .bind(&input.suggestions)
            .fetch_one(pool)
            .await
    }

    /// The user's own feedback for one experiment, if any.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        experiment_no: i32,
    ) -> Result<Option<Feedback>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feedbacks WHERE user_id = $1 AND experiment_no = $2"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(user_id)
            .bind(experiment_no)
            .fetch_optional(pool)
            .await
    }

    /// All feedback for an experiment with submitter details, newest first.
    pub async fn list_for_experiment(
        pool: &PgPool,
        experiment_no: i32,
    ) -> Result<Vec<FeedbackWithUser>, sqlx::Error> {
        sqlx::query_as::<_, FeedbackWithUser>(
            "SELECT f.id, f.user_id, f.experiment_no, f.understanding, f.difficulty,
                    f.usefulness, f.comments, f.suggestions, f.created_at, f.updated_at,
                    u.name AS user_name, u.email AS user_email
             FROM feedbacks f
             JOIN users u ON u.id = f.user_id
             WHERE f.experiment_no = $1
             ORDER BY f.created_at DESC, f.id DESC",
        )
        .bind(experiment_no)
        .fetch_all(pool)
        .await
    }
}
