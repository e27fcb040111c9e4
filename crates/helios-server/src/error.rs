//! Error types for the HTTP facade.
//!
//! [`ApiError`] converts into the wire error contract: a `500` with a
//! JSON `{error, requestId}` body. The correlation id always survives
//! into the response so failed requests can be chased through the logs.

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use helios_types::ErrorResponse;

/// Errors surfaced by the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A snapshot refresh failed with no usable fallback record.
    #[error("{message}")]
    Refresh {
        /// The engine's failure description.
        message: String,
        /// Correlation id of the failed request.
        request_id: String,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let Self::Refresh { message, request_id } = self;

        let body = ErrorResponse { error: message, request_id: request_id.clone() };
        let mut response =
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }
        response
    }
}
