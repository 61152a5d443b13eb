// Vision models and types
// Author: kelexine (https://github.com/kelexine)

use crate::error::{AppError, Result};
use crate::models::gemini::InlineData;
use base64::Engine;
use bytes::Bytes;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Get canonical MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    /// Try to detect format from MIME type
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    /// Match the upload control's `jpg, jpeg, png` filter
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    /// Detect format from magic bytes at start of image data
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"\xFF\xD8\xFF") {
            Some(ImageFormat::Jpeg)
        } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageFormat::Png)
        } else {
            None
        }
    }
}

/// Value for the HTML `accept` attribute of the upload control.
pub const ACCEPTED_UPLOAD_TYPES: &str = ".jpg,.jpeg,.png,image/jpeg,image/png";

/// Validation limits
pub const MAX_IMAGE_SIZE_BYTES: usize = 20 * 1024 * 1024; // 20MB (Gemini inline limit)

/// A file as received from the upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    /// Content type declared by the browser, if any.
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedImage {
    pub fn new(
        file_name: Option<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name,
            content_type,
            data: data.into(),
        }
    }
}

/// Packaged image ready for the inference call: MIME type plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: Bytes,
}

impl ImagePayload {
    /// Gemini wire form (base64 body, no `data:` prefix)
    pub fn to_inline_data(&self) -> InlineData {
        InlineData {
            mime_type: self.mime_type.clone(),
            data: base64::engine::general_purpose::STANDARD.encode(&self.data),
        }
    }

    /// `data:` URL for the page preview
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Checks applied while packaging.
#[derive(Debug, Clone)]
pub struct PackagingPolicy {
    pub enforce_mime_allow_list: bool,
    pub max_image_bytes: usize,
}

impl Default for PackagingPolicy {
    fn default() -> Self {
        Self {
            enforce_mime_allow_list: true,
            max_image_bytes: MAX_IMAGE_SIZE_BYTES,
        }
    }
}

/// Validate image data size
pub fn validate_image_size(data_len: usize, max: usize) -> Result<()> {
    if data_len > max {
        return Err(AppError::ImageTooLarge { size: data_len, max });
    }
    Ok(())
}
