// Shared test helpers
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use gemsight::config::AppConfig;
use gemsight::error::{AppError, Result};
use gemsight::gemini::InferenceGateway;
use gemsight::models::InferenceRequest;
use gemsight::server::create_router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const BOUNDARY: &str = "gemsight-test-boundary";

/// A 1x1 PNG
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0xDA, 0x63, 0x64, 0xF8, 0xCF, 0x50,
    0x0F, 0x00, 0x03, 0x86, 0x01, 0x80, 0x5A, 0x34, 0x7D, 0x6B, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45,
    0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Gateway stub that answers with a fixed reply and counts calls.
pub struct StubGateway {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<InferenceRequest>>,
}

impl StubGateway {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<InferenceRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceGateway for StubGateway {
    async fn generate(&self, request: &InferenceRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(AppError::GeminiApi(message.clone())),
        }
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

pub fn app_with(gateway: Arc<StubGateway>) -> Router {
    app_with_config(AppConfig::default(), gateway)
}

pub fn app_with_config(config: AppConfig, gateway: Arc<StubGateway>) -> Router {
    create_router(config, gateway).unwrap()
}

/// File part for [`multipart_body`]: (file name, content type, bytes).
pub type FilePart<'a> = (&'a str, &'a str, &'a [u8]);

/// Build a `multipart/form-data` body the way a browser submits the form.
pub fn multipart_body(query: Option<&str>, file: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(query) = query {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"input\"\r\n\r\n{query}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
