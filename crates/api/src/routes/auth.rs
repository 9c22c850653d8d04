//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /signup          -> signup
/// POST /login           -> login
/// GET  /login/success   -> login_success (requires auth)
/// POST /logout          -> logout (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/login/success", get(auth::login_success))
        .route("/logout", post(auth::logout))
}
