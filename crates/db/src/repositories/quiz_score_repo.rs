//! Repository for the `quiz_scores` table.

use sqlx::PgPool;
use vlab_core::quiz::QuizSubmission;
use vlab_core::types::DbId;

use crate::models::quiz_score::QuizScore;

const COLUMNS: &str = "id, user_id, experiment_no, score, total_questions, time_per_question, \
                       completed_at, created_at, updated_at";

pub struct QuizScoreRepo;

impl QuizScoreRepo {
    /// Append a quiz attempt. Earlier attempts are kept.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &QuizSubmission,
    ) -> Result<QuizScore, sqlx::Error> {
        let query = format!(
            "INSERT INTO quiz_scores (user_id, experiment_no, score, total_questions, time_per_question)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuizScore>(&query)
            .bind(user_id)
            .bind(input.experiment_no)
            .bind(input.score)
            .bind(input.total_questions)
            .bind(input.time_per_question)
            .fetch_one(pool)
            .await
    }

    /// Every attempt by the user, most recent first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<QuizScore>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quiz_scores
             WHERE user_id = $1
             ORDER BY completed_at DESC, id DESC"
        );
        sqlx::query_as::<_, QuizScore>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// The user's attempts at one experiment, most recent first.
    pub async fn list_for_user_experiment(
        pool: &PgPool,
        user_id: DbId,
        experiment_no: i32,
    ) -> Result<Vec<QuizScore>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quiz_scores
             WHERE user_id = $1 AND experiment_no = $2
             ORDER BY completed_at DESC, id DESC"
        );
        sqlx::query_as::<_, QuizScore>(&query)
            .bind(user_id)
            .bind(experiment_no)
            .fetch_all(pool)
            .await
    }
}
