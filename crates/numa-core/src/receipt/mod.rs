//! Receipt extraction
//!
//! Turns an uploaded receipt or invoice image into bill fields. Extraction is
//! best-effort: missing fields come back empty, and the caller decides
//! whether the result is good enough to become a bill.

mod anthropic;
mod mock;
mod parsing;

pub use anthropic::AnthropicVisionExtractor;
pub use mock::MockExtractor;
pub use parsing::parse_extraction;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::NewBill;

/// Largest accepted image, in bytes (5 MiB)
pub const MAX_RECEIPT_BYTES: usize = 5 * 1024 * 1024;

/// Image formats the vision model accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMediaType {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageMediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    /// Map a Content-Type header value, ignoring parameters and case
    pub fn from_content_type(content_type: &str) -> Result<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            "image/gif" => Ok(Self::Gif),
            "image/webp" => Ok(Self::Webp),
            _ => Err(Error::InvalidInput(format!(
                "Unsupported file type: {}. Please upload an image (JPEG, PNG, GIF, or WebP).",
                if essence.is_empty() { "unknown" } else { &essence }
            ))),
        }
    }

    /// Guess from a file extension
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "gif" => Ok(Self::Gif),
            "webp" => Ok(Self::Webp),
            other => Err(Error::InvalidInput(format!(
                "Unsupported image extension: .{}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ImageMediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bill fields read off a receipt
///
/// Strings are empty and the amount is 0 when the model could not find them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedBill {
    pub vendor: String,
    pub amount: f64,
    pub due_date: String,
    pub category: String,
}

impl ExtractedBill {
    /// Bill input with empty fields dropped
    pub fn into_new_bill(self) -> NewBill {
        let non_empty = |s: String| {
            let s = s.trim().to_string();
            (!s.is_empty()).then_some(s)
        };
        NewBill {
            vendor: self.vendor.trim().to_string(),
            amount: self.amount,
            due_date: non_empty(self.due_date),
            category: non_empty(self.category),
        }
    }
}

/// Anything that can read bill fields from an image
#[async_trait]
pub trait ReceiptExtractor: Send + Sync {
    async fn extract(&self, image: &[u8], media_type: ImageMediaType) -> Result<ExtractedBill>;

    /// Short label for logs and the health endpoint
    fn name(&self) -> &str;
}

/// Reject images that are empty or too large to send
pub fn check_image_size(image: &[u8]) -> Result<()> {
    if image.is_empty() {
        return Err(Error::InvalidInput("No file uploaded".into()));
    }
    if image.len() > MAX_RECEIPT_BYTES {
        return Err(Error::InvalidInput(format!(
            "File size exceeds 5MB limit ({} bytes)",
            image.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_content_type() {
        assert_eq!(
            ImageMediaType::from_content_type("image/jpeg").unwrap(),
            ImageMediaType::Jpeg
        );
        assert_eq!(
            ImageMediaType::from_content_type("IMAGE/JPG").unwrap(),
            ImageMediaType::Jpeg
        );
        assert_eq!(
            ImageMediaType::from_content_type("image/webp; charset=binary").unwrap(),
            ImageMediaType::Webp
        );
        let err = ImageMediaType::from_content_type("application/pdf").unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("application/pdf"));
        assert!(ImageMediaType::from_content_type("")
            .unwrap_err()
            .to_string()
            .contains("unknown"));
    }

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(ImageMediaType::from_extension("PNG").unwrap(), ImageMediaType::Png);
        assert_eq!(ImageMediaType::from_extension("jpg").unwrap(), ImageMediaType::Jpeg);
        assert!(ImageMediaType::from_extension("tiff").is_err());
    }

    #[test]
    fn test_image_size_limits() {
        assert!(check_image_size(&[]).unwrap_err().is_invalid_input());
        assert!(check_image_size(&[0u8; 16]).is_ok());
        let too_big = vec![0u8; MAX_RECEIPT_BYTES + 1];
        assert!(check_image_size(&too_big).is_err());
        let at_limit = vec![0u8; MAX_RECEIPT_BYTES];
        assert!(check_image_size(&at_limit).is_ok());
    }

    #[test]
    fn test_into_new_bill_drops_empty_fields() {
        let extracted = ExtractedBill {
            vendor: " ACME Corp ".into(),
            amount: 123.45,
            due_date: "".into(),
            category: "Infra".into(),
        };
        let bill = extracted.into_new_bill();
        assert_eq!(bill.vendor, "ACME Corp");
        assert!(bill.due_date.is_none());
        assert_eq!(bill.category.as_deref(), Some("Infra"));
    }
}
