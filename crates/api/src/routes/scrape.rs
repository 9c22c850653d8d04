//! Route definitions for `/scrape`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::scrape;
use crate::state::AppState;

/// Routes mounted at `/scrape`.
///
/// ```text
/// POST /                  -> scrape
/// POST /twitter           -> twitter_search
/// GET  /twitter-stored    -> twitter_stored
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(scrape::scrape))
        .route("/twitter", post(scrape::twitter_search))
        .route("/twitter-stored", get(scrape::twitter_stored))
}
