//! Route definitions for `/experiments`: content and analysis jobs.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{analysis, experiments};
use crate::state::AppState;

/// Largest accepted request body on upload routes (25 MiB).
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Routes mounted at `/experiments`.
///
/// ```text
/// GET  /{no}                              -> get_experiment
/// POST /sentiment-analysis                -> sentiment_csv (multipart or JSON)
/// POST /sentiment-analysis/text           -> sentiment_text
/// POST /sentiment-analysis/text-multi     -> sentiment_multi
/// GET  /default-datasets                  -> default_datasets
/// POST /run-topic-modeling                -> run_topic_modeling (multipart)
/// POST /topic-modeling-default            -> topic_modeling_default
/// GET  /default-datasets-topic            -> default_datasets_topic
/// ```
pub fn router() -> Router<AppState> {
    let uploads = Router::new()
        .route("/sentiment-analysis", post(analysis::sentiment_csv))
        .route("/run-topic-modeling", post(analysis::run_topic_modeling))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .route("/{no}", get(experiments::get_experiment))
        .route("/sentiment-analysis/text", post(analysis::sentiment_text))
        .route(
            "/sentiment-analysis/text-multi",
            post(analysis::sentiment_multi),
        )
        .route("/default-datasets", get(analysis::default_datasets))
        .route(
            "/topic-modeling-default",
            post(analysis::topic_modeling_default),
        )
        .route(
            "/default-datasets-topic",
            get(analysis::default_datasets_topic),
        )
        .merge(uploads)
}
