//! Anthropic Messages API vision backend
//!
//! # Configuration
//!
//! Environment variables:
//! - `ANTHROPIC_API_KEY`: API key (required)
//! - `ANTHROPIC_BASE_URL`: API base URL (default `https://api.anthropic.com`)
//! - `NUMA_VISION_MODEL`: vision-capable model name

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::parsing::parse_extraction;
use super::{check_image_size, ExtractedBill, ImageMediaType, ReceiptExtractor};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_VISION_MODEL: &str = "claude-sonnet-4-5-20250929";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 256;

const SYSTEM_PROMPT: &str = r#"You are a receipt and invoice parser for a finance agent.
Extract ONLY these fields from the uploaded image:

- vendor: the name of the company or person being paid.
- amount: the total amount due in USD (number).
- dueDate: ISO date string if a due date is clearly mentioned (YYYY-MM-DD). If not present, approximate based on "invoice date" + 30 days.
- category: short category like "Infra", "Design", "AI", "SaaS", "Travel", etc.

IMPORTANT: Return ONLY valid JSON. No markdown code blocks, no explanations, no extra text.
Start directly with { and end with }. Example: {"vendor":"ACME Corp","amount":123.45,"dueDate":"2025-11-20","category":"Infra"}"#;

const USER_PROMPT: &str =
    "Parse this receipt or invoice image and return ONLY valid JSON starting with { and ending with }.";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Vec<RequestBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RequestBlock<'a> {
    Text { text: &'a str },
    Image { source: ImageSource<'a> },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    source_type: &'a str,
    media_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// First text block of the reply
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

/// Receipt extractor backed by a hosted vision model
#[derive(Clone)]
pub struct AnthropicVisionExtractor {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for AnthropicVisionExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicVisionExtractor")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl AnthropicVisionExtractor {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Create from environment; `None` without `ANTHROPIC_API_KEY`
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        let base_url =
            std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("NUMA_VISION_MODEL").unwrap_or_else(|_| DEFAULT_VISION_MODEL.to_string());
        Some(Self::new(&base_url, &api_key, &model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn host(&self) -> &str {
        &self.base_url
    }

    fn build_request<'a>(&'a self, image: &[u8], media_type: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: vec![
                    RequestBlock::Text { text: USER_PROMPT },
                    RequestBlock::Image {
                        source: ImageSource {
                            source_type: "base64",
                            media_type,
                            data: base64::engine::general_purpose::STANDARD.encode(image),
                        },
                    },
                ],
            }],
        }
    }
}

#[async_trait]
impl ReceiptExtractor for AnthropicVisionExtractor {
    async fn extract(&self, image: &[u8], media_type: ImageMediaType) -> Result<ExtractedBill> {
        check_image_size(image)?;
        let request = self.build_request(image, media_type.as_str());

        debug!(
            model = %self.model,
            media_type = %media_type,
            bytes = image.len(),
            "Sending receipt to vision model"
        );

        let response = self
            .http_client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "Vision API error ({}): {}",
                status, body
            )));
        }

        let reply: MessagesResponse = response.json().await?;
        debug!(stop_reason = ?reply.stop_reason, "Received vision model reply");

        let text = reply
            .text()
            .ok_or_else(|| Error::InvalidData("Model did not return text content".into()))?;
        parse_extraction(text)
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}
