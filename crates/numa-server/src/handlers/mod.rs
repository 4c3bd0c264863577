//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod agent;
pub mod bills;
pub mod budget;
pub mod receipts;
pub mod status;

// Re-export all handlers for use in router
pub use agent::*;
pub use bills::*;
pub use budget::*;
pub use receipts::*;
pub use status::*;

use axum::extract::Request;
use serde::de::DeserializeOwned;

use crate::AppError;

/// Largest JSON body accepted by the API (64 KB)
const MAX_JSON_BODY: usize = 64 * 1024;

/// Read a JSON body; an empty body yields `T::default()`
pub(crate) async fn read_json_or_default<T>(request: Request) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    let bytes = axum::body::to_bytes(request.into_body(), MAX_JSON_BODY)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))
}
