//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use sensorhub_domain::error::{SensorHubError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`SensorHubError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(SensorHubError);

impl From<SensorHubError> for ApiError {
    fn from(err: SensorHubError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SensorHubError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            SensorHubError::Conflict(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            SensorHubError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            SensorHubError::Transport(err) => {
                tracing::error!(error = %err, "hardware relay failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "WiFi credentials could not be relayed to the device.".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
