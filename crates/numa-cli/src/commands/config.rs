//! Config command: show the active engine configuration

use std::path::Path;

use anyhow::Result;
use numa_core::config::default_config_path;
use numa_core::EngineConfig;

pub fn cmd_config(config_path: Option<&Path>) -> Result<()> {
    let (config, source) = EngineConfig::load(config_path)?;

    println!();
    println!("⚙️  Engine Configuration");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Source: {}", source);
    if let Some(path) = default_config_path() {
        println!("   Override path: {}", path.display());
    }

    let r = &config.review;
    println!();
    println!("   Review when:");
    println!("     amount > {:.0}% of budget", r.budget_share * 100.0);
    println!("     enterprise plan and amount > ${:.2}", r.enterprise_amount);
    println!("     food and amount > ${:.2}", r.food_amount);
    println!("     amount > {}x fair share of budget", r.fair_share_multiplier);

    println!();
    println!("   Tier by amount:");
    println!("     enterprise: > ${:.2}", config.tiers.enterprise_above);
    println!(
        "     pro: > ${:.2} and <= ${:.2}",
        config.tiers.pro_above, config.tiers.enterprise_above
    );

    let k = &config.invoice_keywords;
    println!();
    println!("   Invoice keywords (first match wins):");
    for (name, words) in [
        ("infrastructure", &k.infrastructure),
        ("api", &k.api),
        ("saas", &k.saas),
        ("workspace", &k.workspace),
        ("food", &k.food),
    ] {
        println!("     {:<15} {}", name, words.join(", "));
    }

    let t = &config.tier_keywords;
    println!();
    println!("   Tier keywords (first match wins):");
    for (name, words) in [
        ("enterprise", &t.enterprise),
        ("pro", &t.pro),
        ("team", &t.team),
        ("individual", &t.individual),
    ] {
        println!("     {:<15} {}", name, words.join(", "));
    }
    println!();

    Ok(())
}
