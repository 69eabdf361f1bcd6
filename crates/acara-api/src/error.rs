use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use acara_core::AcaraError;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into(), details: None }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self { status: StatusCode::UNPROCESSABLE_ENTITY, message: message.into(), details: None }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self { status: StatusCode::NOT_FOUND, message: message.into(), details: None }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self { status: StatusCode::CONFLICT, message: message.into(), details: None }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.into(), details: None }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.message, details: self.details };
        (self.status, Json(body)).into_response()
    }
}

impl From<AcaraError> for ApiError {
    fn from(err: AcaraError) -> Self {
        match &err {
            AcaraError::InvalidArgument { .. } => {
                Self::bad_request("Invalid filter argument").with_details(err.to_string())
            }
            AcaraError::Validation { .. } | AcaraError::OutOfBounds { .. } => {
                Self::unprocessable("Submission rejected").with_details(err.to_string())
            }
            AcaraError::NotFound { .. } => {
                Self::not_found("Event not found").with_details(err.to_string())
            }
            AcaraError::InvalidTransition { .. } => {
                Self::conflict("Moderation action rejected").with_details(err.to_string())
            }
            // Persistence failures rolled back cleanly; the caller may retry.
            _ => Self::internal("Internal error").with_details(err.to_string()),
        }
    }
}
