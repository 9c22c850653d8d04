//! Startup seeding of experiment content from a JSON file.
//!
//! The file holds an array of experiment objects (`no`, `title`, `aim`,
//! ...). Each is upserted by number, so re-running with an edited file
//! updates content in place.

use std::path::Path;

use sqlx::PgPool;
use vlab_db::models::experiment::UpsertExperiment;
use vlab_db::repositories::ExperimentRepo;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid experiment number {0}")]
    InvalidNumber(i32),

    #[error("Failed to store experiment: {0}")]
    Database(#[from] sqlx::Error),
}

/// Upsert every experiment in `path`, returning how many were written.
pub async fn seed_experiments(pool: &PgPool, path: &Path) -> Result<usize, SeedError> {
    let raw = tokio::fs::read(path).await?;
    let experiments: Vec<UpsertExperiment> = serde_json::from_slice(&raw)?;

    if let Some(bad) = experiments.iter().find(|e| e.no <= 0) {
        return Err(SeedError::InvalidNumber(bad.no));
    }

    for experiment in &experiments {
        ExperimentRepo::upsert(pool, experiment).await?;
    }

    tracing::info!(
        count = experiments.len(),
        path = %path.display(),
        "Experiments seeded"
    );
    Ok(experiments.len())
}
