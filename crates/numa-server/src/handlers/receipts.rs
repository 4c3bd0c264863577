//! Receipt parsing handler

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    Json,
};
use tracing::{debug, warn};

use crate::{AppError, AppState};
use numa_core::{receipt::check_image_size, ExtractedBill, ImageMediaType, MAX_RECEIPT_BYTES};

/// POST /api/receipts/parse - Read bill fields off a receipt image
///
/// The body is the raw image; its format comes from `Content-Type`. Nothing
/// is stored: the client reviews the fields and posts them to `/api/bills`.
pub async fn parse_receipt(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ExtractedBill>, AppError> {
    let extractor = state.extractor.as_ref().ok_or_else(|| {
        AppError::service_unavailable(
            "Receipt extraction not configured. Set ANTHROPIC_API_KEY environment variable.",
        )
    })?;

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let media_type = ImageMediaType::from_content_type(&content_type)?;

    let bytes = axum::body::to_bytes(request.into_body(), MAX_RECEIPT_BYTES)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body or file too large (max 5MB)"))?;
    check_image_size(&bytes)?;

    debug!(media_type = %media_type, bytes = bytes.len(), "Parsing receipt");

    match extractor.extract(&bytes, media_type).await {
        Ok(extracted) => Ok(Json(extracted)),
        Err(e) if e.is_invalid_input() => Err(AppError::bad_request(&e.to_string())),
        Err(e) => {
            warn!(error = %e, extractor = extractor.name(), "Receipt extraction failed");
            Err(AppError::internal(&format!("Failed to parse receipt: {}", e)))
        }
    }
}
