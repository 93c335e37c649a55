//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use devicehub_domain::error::DeviceHubError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`DeviceHubError`] to an HTTP response with appropriate status code.
///
/// A missing device is answered with a bare `404`, without a body.
#[derive(Debug)]
pub struct ApiError(DeviceHubError);

impl From<DeviceHubError> for ApiError {
    fn from(err: DeviceHubError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DeviceHubError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            DeviceHubError::NotFound(err) => {
                tracing::debug!(error = %err, "not found");
                return StatusCode::NOT_FOUND.into_response();
            }
            DeviceHubError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
