//! Route definitions for `/quiz-scores`.

use axum::routing::get;
use axum::Router;

use crate::handlers::quiz_scores;
use crate::state::AppState;

/// Routes mounted at `/quiz-scores`. All require auth.
///
/// ```text
/// GET  /                   -> list_own_scores
/// POST /                   -> submit_score
/// GET  /experiment/{no}    -> list_own_scores_for_experiment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(quiz_scores::list_own_scores).post(quiz_scores::submit_score),
        )
        .route(
            "/experiment/{no}",
            get(quiz_scores::list_own_scores_for_experiment),
        )
}
