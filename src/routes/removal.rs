//! Background-removal proxy route.

use axum::extract::{Multipart, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::services::removal;
use crate::state::AppState;

/// Multipart field carrying the upload.
pub const IMAGE_FIELD: &str = "image";

/// `true` when the body is a cutout, `false` when it is the original upload.
pub const BACKGROUND_REMOVED_HEADER: HeaderName = HeaderName::from_static("x-background-removed");

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// `POST /remove-background`: cut the background out of an uploaded garment.
///
/// Answers 200 even when the removal service is down; the header tells the
/// client which image it got back.
pub async fn remove_background(State(state): State<AppState>, mut multipart: Multipart) -> Result<Response, StatusCode> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "malformed multipart upload");
        StatusCode::BAD_REQUEST
    })? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or(FALLBACK_CONTENT_TYPE).to_string();
        let bytes = field.bytes().await.map_err(|e| {
            warn!(error = %e, "failed to read image field");
            StatusCode::BAD_REQUEST
        })?;
        if bytes.is_empty() {
            return Err(StatusCode::BAD_REQUEST);
        }

        let processed = removal::remove_or_fallback(state.remover.as_ref(), bytes.to_vec(), &content_type).await;
        let headers = [
            (CONTENT_TYPE, processed.content_type),
            (BACKGROUND_REMOVED_HEADER, processed.background_removed.to_string()),
        ];
        return Ok((headers, processed.bytes).into_response());
    }

    warn!("upload has no image field");
    Err(StatusCode::BAD_REQUEST)
}

#[cfg(test)]
#[path = "removal_test.rs"]
mod tests;
