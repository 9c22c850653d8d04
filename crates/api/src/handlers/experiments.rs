//! Handlers for experiment content.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use vlab_core::experiment::parse_experiment_no;
use vlab_db::models::experiment::Experiment;
use vlab_db::repositories::ExperimentRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/experiments/{no}
///
/// 400 for a non-numeric number. An unknown number is a 404 whose body lists
/// the experiments that do exist, so the client can offer alternatives.
pub async fn get_experiment(
    State(state): State<AppState>,
    Path(raw_no): Path<String>,
) -> AppResult<Response> {
    let no = parse_experiment_no(&raw_no)?;

    if let Some(experiment) = ExperimentRepo::find_by_no(&state.pool, no).await? {
        return Ok(Json(DataResponse::<Experiment> { data: experiment }).into_response());
    }

    let available = ExperimentRepo::list_summaries(&state.pool).await?;
    tracing::debug!(no, available = available.len(), "Experiment not found");

    let body = json!({
        "error": "Experiment not found",
        "code": "NOT_FOUND",
        "message": format!("Experiment {no} does not exist"),
        "available_experiments": available,
    });
    Ok((StatusCode::NOT_FOUND, Json(body)).into_response())
}
