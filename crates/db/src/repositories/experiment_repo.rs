//! Repository for the `experiments` table.

use sqlx::PgPool;

use crate::models::experiment::{Experiment, ExperimentSummary, UpsertExperiment};

const COLUMNS: &str = "id, no, title, aim, theory, procedure, simulation, quiz, \"references\", \
                       feedback, created_at, updated_at";

pub struct ExperimentRepo;

impl ExperimentRepo {
    /// Find an experiment by its number.
    pub async fn find_by_no(pool: &PgPool, no: i32) -> Result<Option<Experiment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM experiments WHERE no = $1");
        sqlx::query_as::<_, Experiment>(&query)
            .bind(no)
            .fetch_optional(pool)
            .await
    }

    /// Number and title of every experiment, ordered by number.
    pub async fn list_summaries(pool: &PgPool) -> Result<Vec<ExperimentSummary>, sqlx::Error> {
        sqlx::query_as::<_, ExperimentSummary>("SELECT no, title FROM experiments ORDER BY no")
            .fetch_all(pool)
            .await
    }

    /// Insert or replace the experiment with the same number.
    pub async fn upsert(pool: &PgPool, input: &UpsertExperiment) -> Result<Experiment, sqlx::Error> {
        let query = format!(
            "INSERT INTO experiments
                (no, title, aim, theory, procedure, simulation, quiz, \"references\", feedback)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (no) DO UPDATE
             SET title = EXCLUDED.title,
                 aim = EXCLUDED.aim,
                 theory = EXCLUDED.theory,
                 procedure = EXCLUDED.procedure,
                 simulation = EXCLUDED.simulation,
                 quiz = EXCLUDED.quiz,
                 \"references\" = EXCLUDED.\"references\",
                 feedback = EXCLUDED.feedback
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Experiment>(&query)
            .bind(input.no)
            .bind(&input.title)
            .bind(&input.aim)
            .bind(&input.theory)
            .bind(&input.procedure)
            .bind(&input.simulation)
            .bind(&input.quiz)
            .bind(&input.references)
            .bind(&input.feedback)
            .fetch_one(pool)
            .await
    }
}
