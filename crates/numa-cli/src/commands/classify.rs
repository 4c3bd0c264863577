//! Classify command

use std::path::Path;

use anyhow::Result;
use numa_core::scoring::{base_priority, criticality, plan_bonus};
use numa_core::{Bill, BillStatus};

use super::load_engine;

pub fn cmd_classify(
    config_path: Option<&Path>,
    vendor: &str,
    category: Option<&str>,
    amount: f64,
) -> Result<()> {
    let engine = load_engine(config_path)?;
    let bill = Bill {
        id: "cli".to_string(),
        vendor: vendor.to_string(),
        amount,
        due_date: None,
        status: BillStatus::Pending,
        category: category.map(String::from),
    };

    let invoice_type = engine.classifier().classify_invoice_type(&bill);
    let plan_tier = engine.classifier().detect_plan_tier(&bill);

    println!();
    println!("🏷️  {}", vendor);
    println!("   Type: {} (base priority {})", invoice_type, base_priority(invoice_type));
    println!("   Tier: {} (plan bonus {:+})", plan_tier, plan_bonus(plan_tier));
    let crit = criticality(invoice_type, amount);
    if crit != 0 {
        println!("   Criticality: {:+}", crit);
    }
    if invoice_type.is_critical() {
        println!("   ⚡ Critical service");
    }
    println!();
    Ok(())
}
