//! Handlers for quiz score history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use vlab_core::experiment::parse_experiment_no;
use vlab_core::quiz::QuizSubmission;
use vlab_db::models::quiz_score::QuizScore;
use vlab_db::repositories::QuizScoreRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// POST /api/v1/quiz-scores
///
/// Append one attempt; earlier attempts are never overwritten.
pub async fn submit_score(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<QuizSubmission>,
) -> AppResult<(StatusCode, Json<MessageResponse<QuizScore>>)> {
    input.check()?;

    let score = QuizScoreRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        experiment_no = input.experiment_no,
        score = input.score,
        total = input.total_questions,
        "Quiz score saved"
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Quiz score saved successfully".into(),
            data: score,
        }),
    ))
}

/// GET /api/v1/quiz-scores
pub async fn list_own_scores(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<QuizScore>>>> {
    let scores = QuizScoreRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: scores }))
}

/// GET /api/v1/quiz-scores/experiment/{no}
pub async fn list_own_scores_for_experiment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(raw_no): Path<String>,
) -> AppResult<Json<DataResponse<Vec<QuizScore>>>> {
    let experiment_no = parse_experiment_no(&raw_no)?;
    let scores =
        QuizScoreRepo::list_for_user_experiment(&state.pool, auth.user_id, experiment_no).await?;
    Ok(Json(DataResponse { data: scores }))
}
