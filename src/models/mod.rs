//! Data models for the Gemini API and the inference call.
//!
//! This module contains the type definitions for:
//! - The upstream Google Gemini REST API (`gemini`)
//! - The per-submission inference request and fixed instruction (`inference`)

// Author: kelexine (https://github.com/kelexine)

pub mod gemini;
pub mod inference;

pub use gemini::{Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part};
pub use inference::{InferenceRequest, INSTRUCTION_PROMPT};
