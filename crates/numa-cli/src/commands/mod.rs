//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `allocate` - Allocation runs over a bill file
//! - `classify` - Single-vendor classification
//! - `config` - Show the active engine configuration
//! - `receipts` - Receipt image extraction
//! - `score` - Per-bill scoring breakdown
//! - `serve` - Web server command

pub mod allocate;
pub mod classify;
pub mod config;
pub mod receipts;
pub mod score;
pub mod serve;

// Re-export command functions for main.rs
pub use allocate::*;
pub use classify::*;
pub use config::*;
pub use receipts::*;
pub use score::*;
pub use serve::*;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use numa_core::scoring::parse_due_date;
use numa_core::{AllocationEngine, Bill, EngineConfig};
use tracing::debug;

/// Build the engine from the resolved configuration
pub fn load_engine(config_path: Option<&Path>) -> Result<AllocationEngine> {
    let (config, source) = EngineConfig::load(config_path)?;
    debug!(source = %source, "Engine config loaded");
    Ok(AllocationEngine::new(&config)?)
}

/// Read a JSON array of bills
pub fn load_bills(path: &Path) -> Result<Vec<Bill>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read bills file: {}", path.display()))?;
    let bills: Vec<Bill> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid bills JSON in {}", path.display()))?;
    debug!(count = bills.len(), path = %path.display(), "Loaded bills");
    Ok(bills)
}

/// Reference time from `--now`, or the current time
pub fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        None => Ok(Utc::now()),
        Some(s) => parse_due_date(s)
            .ok_or_else(|| anyhow!("Invalid --now value '{}' (use RFC 3339 or YYYY-MM-DD)", s)),
    }
}

/// Truncate a string to max length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
