// HTTP middleware
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{upload_rejected, Endpoint};
use super::routes::AppState;
use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// `x-request-id` layers: assign a UUID to every submission and echo it back,
/// so a failed extraction in the page can be matched to its log lines.
pub fn request_id_layers() -> (SetRequestIdLayer<MakeRequestUuid>, PropagateRequestIdLayer) {
    (
        SetRequestIdLayer::x_request_id(MakeRequestUuid),
        PropagateRequestIdLayer::x_request_id(),
    )
}

/// Refuse bodies whose declared `Content-Length` is over the upload limit
/// before they are read, answering the way the target route answers its own
/// errors. Bodies without a length are capped while streaming instead.
pub async fn reject_oversized_upload(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());

    match declared {
        Some(length) if length > state.body_limit() => {
            let endpoint = Endpoint::for_path(request.uri().path());
            upload_rejected(
                endpoint,
                AppError::UploadTooLarge {
                    max: state.policy.max_image_bytes,
                },
            )
        }
        _ => next.run(request).await,
    }
}
