//! Shared response types for API handlers.
//!
//! CRUD endpoints wrap payloads in [`DataResponse`]. Analysis endpoints
//! return the job [`Envelope`] as-is through [`EnvelopeResponse`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vlab_core::jobs::envelope::Envelope;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "message": ..., "data": T }`, for endpoints that report what happened
/// alongside the payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse<T: Serialize> {
    pub message: String,
    pub data: T,
}

/// HTTP rendering of a job [`Envelope`]: 200 on success, 500 for every
/// failure status.
#[derive(Debug)]
pub struct EnvelopeResponse(pub Envelope);

impl IntoResponse for EnvelopeResponse {
    fn into_response(self) -> Response {
        let status = if self.0.is_success() {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(self.0)).into_response()
    }
}
