//! Lenient parsing of the vision model's reply
//!
//! Models are told to answer with bare JSON but sometimes wrap it in code
//! fences or prose, so the object is dug out before giving up.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

use super::ExtractedBill;

const RAW_PREVIEW_CHARS: usize = 200;

/// Parse the model reply into bill fields
pub fn parse_extraction(text: &str) -> Result<ExtractedBill> {
    let value = match serde_json::from_str::<Value>(text.trim()) {
        Ok(value) => value,
        Err(_) => extract_object(text).ok_or_else(|| {
            Error::InvalidData(format!(
                "Failed to parse model response as JSON | Raw: {}",
                preview(text)
            ))
        })?,
    };

    match value {
        Value::Object(fields) => Ok(from_fields(&fields)),
        _ => Err(Error::InvalidData(format!(
            "Expected a JSON object from model | Raw: {}",
            preview(text)
        ))),
    }
}

/// Strip code fences and parse the outermost `{...}`
fn extract_object(text: &str) -> Option<Value> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if start >= end {
        return None;
    }
    serde_json::from_str(&cleaned[start..=end]).ok()
}

fn from_fields(fields: &Map<String, Value>) -> ExtractedBill {
    ExtractedBill {
        vendor: text_field(fields.get("vendor")),
        amount: amount_field(fields.get("amount")),
        due_date: text_field(fields.get("dueDate")),
        category: text_field(fields.get("category")),
    }
}

fn text_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Numbers pass through; numeric strings are coerced; anything else is 0
fn amount_field(value: Option<&Value>) -> f64 {
    let amount = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

fn preview(text: &str) -> String {
    text.chars().take(RAW_PREVIEW_CHARS).collect()
}
