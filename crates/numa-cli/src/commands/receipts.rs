//! Receipt extraction command

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use numa_core::{AnthropicVisionExtractor, ImageMediaType, ReceiptExtractor};

/// Extract bill fields from an image and print them as JSON
pub async fn cmd_parse_receipt(file: &Path) -> Result<()> {
    let extractor = AnthropicVisionExtractor::from_env()
        .ok_or_else(|| anyhow!("ANTHROPIC_API_KEY not set. Receipt extraction is unavailable."))?;

    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| anyhow!("Cannot tell the image format of {}", file.display()))?;
    let media_type = ImageMediaType::from_extension(ext)?;

    let image = std::fs::read(file)
        .with_context(|| format!("Failed to read image: {}", file.display()))?;

    println!("🧾 Parsing {} with {}...", file.display(), extractor.model());
    let extracted = extractor.extract(&image, media_type).await?;

    println!("{}", serde_json::to_string_pretty(&extracted)?);
    Ok(())
}
