//! Route definitions for `/feedback`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::feedback;
use crate::state::AppState;

/// Routes mounted at `/feedback`. All require auth.
///
/// ```text
/// POST /experiment-feedback              -> submit_feedback
/// GET  /experiment-feedback/{no}         -> get_own_feedback
/// GET  /experiment-feedback/{no}/all     -> list_experiment_feedback (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/experiment-feedback", post(feedback::submit_feedback))
        .route("/experiment-feedback/{no}", get(feedback::get_own_feedback))
        .route(
            "/experiment-feedback/{no}/all",
            get(feedback::list_experiment_feedback),
        )
}
