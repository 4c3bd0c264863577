//! Allocation command

use std::path::Path;

use anyhow::Result;
use numa_core::{AllocationResult, Bill};

use super::{load_bills, load_engine, parse_now, truncate};

pub fn cmd_allocate(
    config_path: Option<&Path>,
    bills_path: &Path,
    budget: f64,
    now: Option<&str>,
    json: bool,
) -> Result<()> {
    let engine = load_engine(config_path)?;
    let bills = load_bills(bills_path)?;
    let now = parse_now(now)?;

    let result = engine.allocate(&bills, budget, now)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_allocation(&result));
    }
    Ok(())
}

/// Human-readable report of an allocation result
pub fn render_allocation(result: &AllocationResult) -> String {
    let mut out = String::new();

    out.push_str("\n🤖 Agent Decision\n");
    out.push_str(&format!("{}\n", "─".repeat(60)));

    render_section(&mut out, "✅ Pay", &result.to_pay);
    render_section(&mut out, "⚠️  Review", &result.to_review);
    render_section(&mut out, "⏸️  Defer", &result.to_defer);

    out.push_str(&format!(
        "\n   Selected: ${:.2}   Remaining: ${:.2}\n",
        result.total_selected, result.remaining_budget
    ));

    if !result.comparison_notes.is_empty() {
        out.push_str("\n💡 Notes\n");
        for note in &result.comparison_notes {
            out.push_str(&format!("   {}\n", note));
        }
    }

    out.push_str(&format!("\n{}\n", result.explanation));
    out
}

fn render_section(out: &mut String, title: &str, bills: &[Bill]) {
    if bills.is_empty() {
        return;
    }
    out.push_str(&format!("\n{} ({})\n", title, bills.len()));
    for bill in bills {
        out.push_str(&format!(
            "   {:<30} ${:>10.2}  {}\n",
            truncate(&bill.vendor, 30),
            bill.amount,
            bill.due_date.as_deref().unwrap_or("no due date")
        ));
    }
}
