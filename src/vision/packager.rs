// Upload packaging
// Author: kelexine (https://github.com/kelexine)

use super::models::{validate_image_size, ImageFormat, ImagePayload, PackagingPolicy, UploadedImage};
use crate::error::{AppError, Result};
use tracing::debug;

const OCTET_STREAM: &str = "application/octet-stream";

/// Turn an uploaded file into an [`ImagePayload`].
///
/// The bytes are passed through untouched. The declared content type is kept
/// verbatim; it is only sniffed from the data when the browser sent none.
/// With the allow-list off, a type that cannot be sniffed is sent as declared
/// (or as `application/octet-stream`).
pub fn package_image(
    upload: Option<&UploadedImage>,
    policy: &PackagingPolicy,
) -> Result<ImagePayload> {
    let upload = upload.ok_or(AppError::NoFileProvided)?;

    if upload.data.is_empty() {
        return Err(AppError::EmptyImage);
    }

    validate_image_size(upload.data.len(), policy.max_image_bytes)?;

    let mime_type = resolve_mime_type(upload, policy)?;

    if policy.enforce_mime_allow_list && ImageFormat::from_mime_type(&mime_type).is_none() {
        return Err(AppError::UnsupportedMimeType(mime_type));
    }

    debug!(
        "Packaged upload {:?}: {} bytes as {}",
        upload.file_name,
        upload.data.len(),
        mime_type
    );

    Ok(ImagePayload {
        mime_type,
        data: upload.data.clone(),
    })
}

fn resolve_mime_type(upload: &UploadedImage, policy: &PackagingPolicy) -> Result<String> {
    let declared = upload
        .content_type
        .as_deref()
        .map(str::trim)
        .filter(|declared| !declared.is_empty());

    if let Some(declared) = declared.filter(|declared| *declared != OCTET_STREAM) {
        return Ok(declared.to_string());
    }

    let detected = ImageFormat::sniff(&upload.data).or_else(|| {
        upload
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .and_then(|(_, ext)| ImageFormat::from_extension(ext))
    });

    match detected {
        Some(format) => Ok(format.mime_type().to_string()),
        None if !policy.enforce_mime_allow_list => Ok(declared.unwrap_or(OCTET_STREAM).to_string()),
        None => Err(AppError::UnsupportedMimeType(declared.unwrap_or("unknown").to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG_HEADER: &[u8] = b"\xFF\xD8\xFF\xE0\0\x10JFIF\0";

    fn upload(content_type: Option<&str>, data: &[u8]) -> UploadedImage {
        UploadedImage::new(
            Some("receipt.png".to_string()),
            content_type.map(str::to_string),
            data.to_vec(),
        )
    }

    #[test]
    fn test_no_file() {
        let result = package_image(None, &PackagingPolicy::default());
        assert!(matches!(result, Err(AppError::NoFileProvided)));
    }

    #[test]
    fn test_declared_type_kept_verbatim() {
        let file = upload(Some("image/jpg"), JPEG_HEADER);
        let payload = package_image(Some(&file), &PackagingPolicy::default()).unwrap();
        assert_eq!(payload.mime_type, "image/jpg");
        assert_eq!(&payload.data[..], JPEG_HEADER);
    }

    #[test]
    fn test_empty_upload() {
        let file = upload(Some("image/png"), b"");
        let result = package_image(Some(&file), &PackagingPolicy::default());
        assert!(matches!(result, Err(AppError::EmptyImage)));
    }

    #[test]
    fn test_sniffs_when_type_missing() {
        let file = upload(None, PNG_HEADER);
        let payload = package_image(Some(&file), &PackagingPolicy::default()).unwrap();
        assert_eq!(payload.mime_type, "image/png");

        let file = upload(Some("application/octet-stream"), JPEG_HEADER);
        let payload = package_image(Some(&file), &PackagingPolicy::default()).unwrap();
        assert_eq!(payload.mime_type, "image/jpeg");
    }

    #[test]
    fn test_falls_back_to_extension() {
        let file = UploadedImage::new(Some("scan.JPG".to_string()), None, b"not really".to_vec());
        let payload = package_image(Some(&file), &PackagingPolicy::default()).unwrap();
        assert_eq!(payload.mime_type, "image/jpeg");
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let file = upload(Some("image/gif"), b"GIF89a....");
        let result = package_image(Some(&file), &PackagingPolicy::default());
        assert!(matches!(result, Err(AppError::UnsupportedMimeType(t)) if t == "image/gif"));
    }

    #[test]
    fn test_allow_list_can_be_disabled() {
        let policy = PackagingPolicy {
            enforce_mime_allow_list: false,
            ..PackagingPolicy::default()
        };
        let file = upload(Some("image/webp"), b"RIFF....WEBP");
        let payload = package_image(Some(&file), &policy).unwrap();
        assert_eq!(payload.mime_type, "image/webp");
    }

    #[test]
    fn test_unknown_bytes_pass_through_when_allow_list_disabled() {
        let policy = PackagingPolicy {
            enforce_mime_allow_list: false,
            ..PackagingPolicy::default()
        };
        let octet = UploadedImage::new(
            Some("a.webp".to_string()),
            Some("application/octet-stream".to_string()),
            b"RIFF....WEBP".to_vec(),
        );
        let payload = package_image(Some(&octet), &policy).unwrap();
        assert_eq!(payload.mime_type, "application/octet-stream");
        assert_eq!(&payload.data[..], b"RIFF....WEBP");

        let untyped =
            UploadedImage::new(Some("a.webp".to_string()), None, b"RIFF....WEBP".to_vec());
        let payload = package_image(Some(&untyped), &policy).unwrap();
        assert_eq!(payload.mime_type, "application/octet-stream");

        let enforced = package_image(Some(&octet), &PackagingPolicy::default());
        assert!(matches!(enforced, Err(AppError::UnsupportedMimeType(_))));
    }

    #[test]
    fn test_size_limit() {
        let policy = PackagingPolicy {
            max_image_bytes: 4,
            ..PackagingPolicy::default()
        };
        let file = upload(Some("image/png"), PNG_HEADER);
        let result = package_image(Some(&file), &policy);
        assert!(matches!(result, Err(AppError::ImageTooLarge { max: 4, .. })));
    }

    #[test]
    fn test_packaging_is_idempotent() {
        let file = upload(Some("image/png"), PNG_HEADER);
        let first = package_image(Some(&file), &PackagingPolicy::default()).unwrap();
        let second = package_image(Some(&file), &PackagingPolicy::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_inline_data_is_base64() {
        let file = upload(Some("image/png"), b"abc");
        let policy = PackagingPolicy {
            enforce_mime_allow_list: true,
            max_image_bytes: 10,
        };
        let inline = package_image(Some(&file), &policy).unwrap().to_inline_data();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "YWJj");
    }

    #[test]
    fn test_data_url() {
        let payload = ImagePayload {
            mime_type: "image/jpeg".to_string(),
            data: bytes::Bytes::from_static(b"abc"),
        };
        assert_eq!(payload.to_data_url(), "data:image/jpeg;base64,YWJj");
    }
}
