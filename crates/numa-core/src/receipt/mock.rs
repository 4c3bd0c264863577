//! Mock extractor for testing
//!
//! Returns a canned result without any network access.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::{check_image_size, ExtractedBill, ImageMediaType, ReceiptExtractor};

#[derive(Debug, Clone)]
pub struct MockExtractor {
    reply: Option<ExtractedBill>,
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new(ExtractedBill {
            vendor: "ACME Corp".into(),
            amount: 123.45,
            due_date: "2025-11-20".into(),
            category: "Infra".into(),
        })
    }
}

impl MockExtractor {
    pub fn new(reply: ExtractedBill) -> Self {
        Self { reply: Some(reply) }
    }

    /// An extractor whose every call fails as an unreadable reply would
    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl ReceiptExtractor for MockExtractor {
    async fn extract(&self, image: &[u8], _media_type: ImageMediaType) -> Result<ExtractedBill> {
        check_image_size(image)?;
        self.reply
            .clone()
            .ok_or_else(|| Error::InvalidData("Mock extractor configured to fail".into()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
