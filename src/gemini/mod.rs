// Gemini API client module
// Author: kelexine (https://github.com/kelexine)

mod client;

pub use client::GeminiClient;

use crate::error::Result;
use crate::models::InferenceRequest;
use async_trait::async_trait;

/// Remote multimodal text generation.
///
/// The web layer only sees this trait so tests can swap in a stub.
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Issue one request and return the generated text verbatim.
    async fn generate(&self, request: &InferenceRequest) -> Result<String>;

    /// Model identifier used for every call.
    fn model(&self) -> &str;
}
