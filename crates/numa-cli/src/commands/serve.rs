//! Server command implementation

use std::path::Path;

use anyhow::Result;
use numa_core::Ledger;

use super::load_engine;

pub async fn cmd_serve(
    config_path: Option<&Path>,
    host: &str,
    port: u16,
    daily_limit: f64,
) -> Result<()> {
    let engine = load_engine(config_path)?;
    let ledger = Ledger::new(daily_limit)?;

    println!("🚀 Starting Numa web server...");
    println!("   Listening: http://{}:{}", host, port);
    println!("   Daily limit: ${:.2}", daily_limit);
    println!("   State: in-memory (lost on restart)");

    numa_server::serve(ledger, engine, host, port).await
}
