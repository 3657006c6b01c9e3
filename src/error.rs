use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub const MISSING_KEY_MESSAGE: &str =
    "Gemini AI service not configured. Please set GEMINI_API_KEY environment variable.";

/// Failures a client can see. Each kind has its own status code.
#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    BadInput(String),
    #[error("{0}")]
    ServiceUnavailable(String),
    #[error("{0}")]
    UnprocessableContent(String),
    #[error("{0}")]
    InternalFailure(String),
}

impl ApiError {
    pub fn not_configured() -> Self {
        ApiError::ServiceUnavailable(MISSING_KEY_MESSAGE.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadInput(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::UnprocessableContent(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("❌ {} {}", status, self);
        } else {
            log::warn!("⚠️ {} {}", status, self);
        }

        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}
