//! Experiment content model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vlab_core::types::{DbId, Timestamp};

/// Full experiment row. All content fields are display text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Experiment {
    pub id: DbId,
    pub no: i32,
    pub title: String,
    pub aim: String,
    pub theory: String,
    pub procedure: String,
    pub simulation: String,
    pub quiz: String,
    pub references: String,
    pub feedback: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Number and title only, for "available experiments" listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExperimentSummary {
    pub no: i32,
    pub title: String,
}

/// Seed record; missing text fields default to empty.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertExperiment {
    pub no: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub aim: String,
    #[serde(default)]
    pub theory: String,
    #[serde(default)]
    pub procedure: String,
    #[serde(default)]
    pub simulation: String,
    #[serde(default)]
    pub quiz: String,
    #[serde(default)]
    pub references: String,
    #[serde(default)]
    pub feedback: String,
}
