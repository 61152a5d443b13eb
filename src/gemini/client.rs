// Gemini API client
// Author: kelexine (https://github.com/kelexine)

use super::InferenceGateway;
use crate::config::GeminiConfig;
use crate::error::{AppError, Result};
use crate::models::gemini::GenerateContentResponse;
use crate::models::InferenceRequest;
use crate::utils::logging::sanitize;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the public Google Gemini REST API.
///
/// Sends exactly one `generateContent` call per request. There is no retry,
/// and no timeout unless one is configured.
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Build the client from the configuration loaded at startup.
    ///
    /// A missing API key is accepted here; the first call will then fail
    /// with an authentication error from the service.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let mut builder = Client::builder().use_rustls_tls();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        if config.api_key.is_none() {
            info!("No API key configured; Gemini calls will be sent unauthenticated");
        }

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Get the API base_url
    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        #[derive(serde::Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(serde::Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            status: Option<String>,
        }

        if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(response_text) {
            if let Some(error) = error_resp.error {
                return error.message.or(error.status);
            }
        }
        None
    }

    fn map_status(status: StatusCode, message: String) -> AppError {
        match status.as_u16() {
            401 | 403 => AppError::Authentication(message),
            429 => AppError::QuotaExceeded(message),
            503 | 504 => AppError::ServiceUnavailable(message),
            _ => AppError::GeminiApi(format!("HTTP {}: {}", status.as_u16(), message)),
        }
    }

    /// Call Gemini `generateContent` (blocking, single attempt).
    pub async fn generate_content(&self, request: &InferenceRequest) -> Result<String> {
        let url = self.endpoint();
        let body = request.to_gemini_request();

        debug!(
            "Calling generateContent for model {} ({} image bytes, query {} chars)",
            self.config.model,
            request.image.len(),
            request.query.chars().count()
        );

        let mut http_request = self.http_client.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            http_request = http_request.header(API_KEY_HEADER, key);
        }

        let start = Instant::now();
        let response = http_request.send().await.map_err(|e| {
            error!("Gemini request failed: {}", sanitize(&e.to_string()));
            let elapsed = start.elapsed().as_secs_f64();
            crate::metrics::record_gemini_call(&self.config.model, 0, elapsed);
            AppError::Http(e.without_url())
        })?;

        let status = response.status();
        crate::metrics::record_gemini_call(
            &self.config.model,
            status.as_u16(),
            start.elapsed().as_secs_f64(),
        );

        let response_text = response
            .text()
            .await
            .map_err(|e| AppError::GeminiApi(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            error!(
                "Gemini API error: HTTP {} - Response body: {}",
                status,
                sanitize(&response_text)
            );
            let message = Self::extract_error_message(&response_text)
                .unwrap_or_else(|| response_text.clone());
            return Err(Self::map_status(status, message));
        }

        let gemini_response: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| {
                error!("Failed to parse Gemini response: {}", e);
                AppError::GeminiApi(format!("Response parsing error: {}", e))
            })?;

        if let Some(usage) = &gemini_response.usage_metadata {
            debug!(
                "Token usage: prompt={:?} candidates={:?} total={:?}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        gemini_response
            .text()
            .ok_or_else(|| AppError::EmptyResponse(gemini_response.empty_reason()))
    }
}

#[async_trait]
impl InferenceGateway for GeminiClient {
    async fn generate(&self, request: &InferenceRequest) -> Result<String> {
        self.generate_content(request).await
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
