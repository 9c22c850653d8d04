//! Handlers for experiment feedback.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use vlab_core::experiment::parse_experiment_no;
use vlab_core::feedback::FeedbackSubmission;
use vlab_db::models::feedback::{Feedback, FeedbackWithUser};
use vlab_db::repositories::FeedbackRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// POST /api/v1/feedback/experiment-feedback
///
/// Create or replace the caller's feedback for an experiment. 201 when the
/// row is new, 200 when an existing row was overwritten.
pub async fn submit_feedback(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<FeedbackSubmission>,
) -> AppResult<(StatusCode, Json<MessageResponse<Feedback>>)> {
    input.check()?;

    let result = FeedbackRepo::upsert(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        experiment_no = input.experiment_no,
        created = result.created,
        "Feedback stored"
    );

    let (status, message) = if result.created {
        (StatusCode::CREATED, "Feedback submitted successfully")
    } else {
        (StatusCode::OK, "Feedback updated successfully")
    };

    Ok((
        status,
        Json(MessageResponse {
            message: message.into(),
            data: result.feedback,
        }),
    ))
}

/// GET /api/v1/feedback/experiment-feedback/{no}
pub async fn get_own_feedback(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(raw_no): Path<String>,
) -> AppResult<Json<DataResponse<Feedback>>> {
    let experiment_no = parse_experiment_no(&raw_no)?;

    let feedback = FeedbackRepo::find_for_user(&state.pool, auth.user_id, experiment_no)
        .await?
        .ok_or_else(|| AppError::NotFound("No feedback found for this experiment".into()))?;

    Ok(Json(DataResponse { data: feedback }))
}

/// GET /api/v1/feedback/experiment-feedback/{no}/all
///
/// Admin only. Newest first, each row carrying the submitter's name and email.
pub async fn list_experiment_feedback(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(raw_no): Path<String>,
) -> AppResult<Json<DataResponse<Vec<FeedbackWithUser>>>> {
    let experiment_no = parse_experiment_no(&raw_no)?;
    let feedback = FeedbackRepo::list_for_experiment(&state.pool, experiment_no).await?;
    Ok(Json(DataResponse { data: feedback }))
}
