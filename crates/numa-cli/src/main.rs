//! Numa CLI - Agent CFO for startup bills
//!
//! Usage:
//!   numa allocate --bills bills.json --budget 300   Decide what to pay today
//!   numa score --bills bills.json                   Show scores and review flags
//!   numa classify --vendor "OpenAI" -c API          Classify one vendor
//!   numa parse-receipt --file invoice.png           Read a receipt image
//!   numa serve --port 3000                          Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Allocate {
            bills,
            budget,
            now,
            json,
        } => commands::cmd_allocate(config, &bills, budget, now.as_deref(), json),
        Commands::Score { bills, budget, now } => {
            commands::cmd_score(config, &bills, budget, now.as_deref())
        }
        Commands::Classify {
            vendor,
            category,
            amount,
        } => commands::cmd_classify(config, &vendor, category.as_deref(), amount),
        Commands::ParseReceipt { file } => commands::cmd_parse_receipt(&file).await,
        Commands::Config => commands::cmd_config(config),
        Commands::Serve {
            port,
            host,
            daily_limit,
        } => commands::cmd_serve(config, &host, port, daily_limit).await,
    }
}
