//! Image packaging for uploaded files.
//!
//! This module turns a browser upload into the typed payload sent to Gemini
//! as `inlineData`. It includes MIME type detection, the JPEG/PNG allow-list,
//! and the upload size limit. Image content is never decoded or resized.
//!
//! # Submodules
//!
//! - `models`: Upload and payload types plus validation constraints.
//! - `packager`: Conversion of an optional upload into a payload.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod models;
pub mod packager;

pub use models::{ImageFormat, ImagePayload, PackagingPolicy, UploadedImage, ACCEPTED_UPLOAD_TYPES};
pub use packager::package_image;
