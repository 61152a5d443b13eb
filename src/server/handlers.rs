// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::page::{self, Outcome, PageView};
use super::routes::AppState;
use crate::error::{AppError, ErrorCategory, Result};
use crate::models::InferenceRequest;
use crate::vision::{package_image, ImagePayload, UploadedImage};
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Multipart field carrying the query text.
pub const QUERY_FIELD: &str = "input";
/// Multipart field carrying the image file.
pub const IMAGE_FIELD: &str = "image";

/// Parsed submission form.
#[derive(Debug, Default)]
pub struct SubmitForm {
    pub query: String,
    pub upload: Option<UploadedImage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub text: String,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub api_key_configured: bool,
    pub timestamp: String,
}

/// Handler for `GET /`
pub async fn index_handler() -> Html<String> {
    Html(page::render(&PageView::default()))
}

/// Which surface a submission came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Form,
    Api,
}

impl Endpoint {
    pub fn for_path(path: &str) -> Self {
        if path.starts_with("/api/") {
            Endpoint::Api
        } else {
            Endpoint::Form
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Form => "form",
            Endpoint::Api => "api",
        }
    }
}

/// Handler for `POST /`: run one submission and render the page with the
/// result or an error banner.
pub async fn submit_handler(State(state): State<AppState>, multipart: Multipart) -> Response {
    let start = Instant::now();
    let mut view = PageView::default();

    let status = match handle_submission(&state, multipart, Some(&mut view)).await {
        Ok(text) => {
            info!("Submission succeeded ({} chars returned)", text.chars().count());
            record_outcome(Endpoint::Form, None, start);
            view.outcome = Some(Outcome::Response(text));
            StatusCode::OK
        }
        Err(e) => {
            log_failure(&e);
            record_outcome(Endpoint::Form, Some(&e), start);
            let status = e.status_code();
            view.outcome = Some(Outcome::Error(e.to_string()));
            status
        }
    };

    (status, Html(page::render(&view))).into_response()
}

/// Handler for `POST /api/extract`: same flow, JSON in and out.
pub async fn extract_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>> {
    let start = Instant::now();

    match handle_submission(&state, multipart, None).await {
        Ok(text) => {
            record_outcome(Endpoint::Api, None, start);
            Ok(Json(ExtractResponse {
                text,
                model: state.gateway.model().to_string(),
            }))
        }
        Err(e) => {
            log_failure(&e);
            record_outcome(Endpoint::Api, Some(&e), start);
            Err(e)
        }
    }
}

/// Answer a submission refused before its body was read: an error page for
/// the form, the JSON error for the API.
pub fn upload_rejected(endpoint: Endpoint, error: AppError) -> Response {
    log_failure(&error);
    record_outcome(endpoint, Some(&error), Instant::now());

    match endpoint {
        Endpoint::Api => error.into_response(),
        Endpoint::Form => {
            let view = PageView {
                outcome: Some(Outcome::Error(error.to_string())),
                ..PageView::default()
            };
            (error.status_code(), Html(page::render(&view))).into_response()
        }
    }
}

/// Handler for `GET /health`
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let api_key_configured = state.config.has_api_key();
    Json(HealthResponse {
        status: if api_key_configured { "healthy" } else { "degraded" }.to_string(),
        model: state.gateway.model().to_string(),
        api_key_configured,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Handler for `GET /metrics`
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::gather_metrics(),
    )
}

/// Read the form, package the image, and make the single gateway call.
/// When a page is being rendered, the query and image preview are filled in
/// as soon as they are known.
///
/// The gateway is only reached once packaging has succeeded.
async fn handle_submission(
    state: &AppState,
    multipart: Multipart,
    mut view: Option<&mut PageView>,
) -> Result<String> {
    let form = read_form(multipart, state.policy.max_image_bytes).await?;
    if let Some(view) = view.as_deref_mut() {
        view.query = form.query.clone();
    }

    let image: ImagePayload = package_image(form.upload.as_ref(), &state.policy)?;
    if let Some(view) = view {
        view.preview = Some(image.to_data_url());
    }

    debug!(
        "Submitting {} byte {} image to {}",
        image.len(),
        image.mime_type,
        state.gateway.model()
    );

    let request = InferenceRequest::new(state.instruction.clone(), image, form.query);
    state.gateway.generate(&request).await
}

/// Collect the query and file fields from a multipart body.
///
/// A file part with no name and no bytes is what browsers send when nothing
/// was chosen, so it counts as no upload. `max_upload_bytes` is only used to
/// report a body that ran past the transport limit.
pub async fn read_form(mut multipart: Multipart, max_upload_bytes: usize) -> Result<SubmitForm> {
    let mut form = SubmitForm::default();
    let malformed = |e: MultipartError| form_error(e, max_upload_bytes);

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(QUERY_FIELD) => {
                form.query = field.text().await.map_err(malformed)?;
            }
            Some(IMAGE_FIELD) => {
                let file_name = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(malformed)?;

                if file_name.is_none() && data.is_empty() {
                    continue;
                }
                form.upload = Some(UploadedImage::new(file_name, content_type, data));
            }
            other => {
                debug!("Ignoring unexpected form field {:?}", other);
            }
        }
    }

    Ok(form)
}

fn form_error(e: MultipartError, max_upload_bytes: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::UploadTooLarge {
            max: max_upload_bytes,
        };
    }
    AppError::InvalidRequest(format!("Malformed form data: {}", e.body_text()))
}

fn log_failure(e: &AppError) {
    match e.category() {
        ErrorCategory::UserInput => warn!("Rejected submission: {}", e),
        ErrorCategory::RemoteService => error!(
            "Gemini call failed: {}",
            crate::utils::logging::sanitize(&e.to_string())
        ),
        ErrorCategory::Internal => error!("Internal error: {}", e),
    }
}

fn record_outcome(endpoint: Endpoint, error: Option<&AppError>, start: Instant) {
    let outcome = error.map_or("success", |e| e.category().as_str());
    crate::metrics::record_submission(endpoint.as_str(), outcome, start.elapsed().as_secs_f64());
}
