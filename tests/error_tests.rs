// Error handling tests
// Author: kelexine (https://github.com/kelexine)

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use gemsight::error::{AppError, ErrorCategory};
use serde_json::Value;

#[test]
fn test_error_display_messages() {
    let errors = vec![
        AppError::NoFileProvided,
        AppError::EmptyImage,
        AppError::UnsupportedMimeType("image/gif".to_string()),
        AppError::ImageTooLarge { size: 30, max: 20 },
        AppError::Authentication("API key not valid".to_string()),
        AppError::QuotaExceeded("Rate limited".to_string()),
        AppError::ServiceUnavailable("Service down".to_string()),
        AppError::GeminiApi("API error".to_string()),
        AppError::EmptyResponse("prompt blocked (SAFETY)".to_string()),
        AppError::Config("bad".to_string()),
    ];

    for error in errors {
        let display = format!("{}", error);
        assert!(!display.is_empty(), "Error should have display message");
    }
}

#[test]
fn test_no_file_message() {
    assert_eq!(AppError::NoFileProvided.to_string(), "No file uploaded");
}

#[test]
fn test_user_input_category() {
    for error in [
        AppError::NoFileProvided,
        AppError::EmptyImage,
        AppError::UnsupportedMimeType("image/gif".to_string()),
        AppError::ImageTooLarge { size: 2, max: 1 },
        AppError::UploadTooLarge { max: 1 },
        AppError::InvalidRequest("Malformed form data".to_string()),
    ] {
        assert_eq!(error.category(), ErrorCategory::UserInput);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }
}

#[test]
fn test_remote_service_category() {
    for error in [
        AppError::Authentication("x".to_string()),
        AppError::QuotaExceeded("x".to_string()),
        AppError::ServiceUnavailable("x".to_string()),
        AppError::GeminiApi("x".to_string()),
        AppError::EmptyResponse("x".to_string()),
    ] {
        assert_eq!(error.category(), ErrorCategory::RemoteService);
        assert_eq!(error.status_code(), StatusCode::BAD_GATEWAY);
    }
}

#[test]
fn test_internal_category() {
    let error = AppError::Config("missing".to_string());
    assert_eq!(error.category(), ErrorCategory::Internal);
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_quota_error_message() {
    let error = AppError::QuotaExceeded("quota exceeded".to_string());
    assert!(format!("{}", error).contains("quota exceeded"));
}

#[tokio::test]
async fn test_json_error_body() {
    let response = AppError::QuotaExceeded("slow down".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["type"], "error");
    assert_eq!(body["error"]["type"], "rate_limit_error");
    assert_eq!(body["error"]["category"], "remote_service");
    assert!(body["error"]["message"].as_str().unwrap().contains("slow down"));
}

#[tokio::test]
async fn test_auth_error_status() {
    let response = AppError::Authentication("API key not valid".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_too_large_status() {
    let error = AppError::UploadTooLarge { max: 16 };
    assert_eq!(error.to_string(), "Upload exceeds maximum of 16 bytes");

    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["type"], "request_too_large");
}
