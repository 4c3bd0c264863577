//! Score command: how the engine sees each pending bill

use std::path::Path;

use anyhow::Result;
use numa_core::BillAssessment;

use super::{load_bills, load_engine, parse_now, truncate};

pub fn cmd_score(
    config_path: Option<&Path>,
    bills_path: &Path,
    budget: f64,
    now: Option<&str>,
) -> Result<()> {
    let engine = load_engine(config_path)?;
    let bills = load_bills(bills_path)?;
    let now = parse_now(now)?;

    let assessments = engine.preview(&bills, budget, now)?;

    if assessments.is_empty() {
        println!("No pending bills to score.");
        return Ok(());
    }

    print!("{}", render_scores(&assessments));
    Ok(())
}

/// Table of assessments in allocation order
pub fn render_scores(assessments: &[BillAssessment]) -> String {
    let mut out = format!(
        "\n{:<24} {:>10}  {:<15} {:<11} {:>5}  {:>4} {:>4} {:>4} {:>4}  {}\n",
        "Vendor", "Amount", "Type", "Tier", "Score", "Base", "Urg", "Crit", "Plan", "Review"
    );
    out.push_str(&format!("{}\n", "─".repeat(100)));

    for a in assessments {
        out.push_str(&format!(
            "{:<24} {:>10.2}  {:<15} {:<11} {:>5}  {:>4} {:>4} {:>4} {:>4}  {}\n",
            truncate(&a.vendor, 24),
            a.amount,
            a.invoice_type.as_str(),
            a.plan_tier.as_str(),
            a.score,
            a.breakdown.base_priority,
            a.breakdown.urgency,
            a.breakdown.criticality,
            a.breakdown.plan_bonus,
            if a.needs_review { "⚠️  yes" } else { "no" }
        ));
    }
    out
}
