// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    extract_handler, health_handler, index_handler, metrics_handler, submit_handler,
};
use super::middleware::{reject_oversized_upload, request_id_layers};
use crate::config::AppConfig;
use crate::error::Result;
use crate::gemini::InferenceGateway;
use crate::models::INSTRUCTION_PROMPT;
use crate::vision::PackagingPolicy;
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and the query field on top of the image.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gateway: Arc<dyn InferenceGateway>,
    pub instruction: Arc<str>,
    pub policy: PackagingPolicy,
}

impl AppState {
    /// Largest request body accepted on the upload routes.
    pub fn body_limit(&self) -> usize {
        self.config.server.max_upload_bytes + FORM_OVERHEAD_BYTES
    }
}

pub fn create_router(config: AppConfig, gateway: Arc<dyn InferenceGateway>) -> Result<Router> {
    let policy = PackagingPolicy {
        enforce_mime_allow_list: config.validation.enforce_mime_allow_list,
        max_image_bytes: config.server.max_upload_bytes,
    };
    let state = AppState {
        config: Arc::new(config),
        gateway,
        instruction: Arc::from(INSTRUCTION_PROMPT),
        policy,
    };
    let body_limit = state.body_limit();

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/", get(index_handler).post(submit_handler))
        .route("/api/extract", post(extract_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        // Multipart uploads are bounded by the layer below instead of axum's 2MB default
        .layer(DefaultBodyLimit::disable())
        .layer(tower_http::limit::RequestBodyLimitLayer::new(body_limit))
        .layer(from_fn_with_state(state.clone(), reject_oversized_upload))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
