// Error types for gemsight
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No file uploaded")]
    NoFileProvided,

    #[error("Uploaded file is empty")]
    EmptyImage,

    #[error("Unsupported image type: {0} (expected image/jpeg or image/png)")]
    UnsupportedMimeType(String),

    #[error("Image size {size} bytes exceeds maximum of {max} bytes")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Upload exceeds maximum of {max} bytes")]
    UploadTooLarge { max: usize },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Gemini API quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Upstream unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Gemini API error: {0}")]
    GeminiApi(String),

    #[error("Gemini returned no text: {0}")]
    EmptyResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Which side of the boundary an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller broke the input contract (no file, wrong type, ...).
    UserInput,
    /// The remote inference call failed (network, auth, quota, model error).
    RemoteService,
    /// Misconfiguration or a bug on our side.
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::UserInput => "user_input",
            ErrorCategory::RemoteService => "remote_service",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::NoFileProvided
            | AppError::EmptyImage
            | AppError::UnsupportedMimeType(_)
            | AppError::ImageTooLarge { .. }
            | AppError::UploadTooLarge { .. }
            | AppError::InvalidRequest(_) => ErrorCategory::UserInput,
            AppError::Authentication(_)
            | AppError::QuotaExceeded(_)
            | AppError::ServiceUnavailable(_)
            | AppError::GeminiApi(_)
            | AppError::EmptyResponse(_)
            | AppError::Http(_) => ErrorCategory::RemoteService,
            AppError::Config(_)
            | AppError::ConfigParsing(_)
            | AppError::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Status used when the error is rendered back to the browser.
    pub fn status_code(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::UserInput => StatusCode::BAD_REQUEST,
            ErrorCategory::RemoteService => StatusCode::BAD_GATEWAY,
            ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Convert AppError to JSON responses for the API route
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            AppError::NoFileProvided
            | AppError::EmptyImage
            | AppError::UnsupportedMimeType(_)
            | AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request_error"),
            AppError::ImageTooLarge { .. } | AppError::UploadTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "request_too_large")
            }
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, "authentication_error"),
            AppError::QuotaExceeded(_) => (StatusCode::TOO_MANY_REQUESTS, "rate_limit_error"),
            AppError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "overloaded_error")
            }
            AppError::GeminiApi(_) | AppError::EmptyResponse(_) | AppError::Http(_) => {
                (StatusCode::BAD_GATEWAY, "api_error")
            }
            AppError::Config(_) | AppError::ConfigParsing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = json!({
            "type": "error",
            "error": {
                "type": error_type,
                "category": self.category().as_str(),
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
