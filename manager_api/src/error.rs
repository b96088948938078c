//! API error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use portainer_client::PortainerError;

pub type ApiResult<T> = Result<T, ApiError>;

/// An error ready to leave the REST surface as an HTTP status plus JSON
/// body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl From<PortainerError> for ApiError {
    fn from(err: PortainerError) -> Self {
        // Validation failures are the caller's fault; everything else the
        // orchestrator call failed, which is a gateway problem from the
        // client's point of view.
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::BAD_GATEWAY
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
