//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Numa - Agent CFO for startup bills
#[derive(Parser)]
#[command(name = "numa")]
#[command(about = "Prioritize bills and allocate a daily budget", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine config file (overrides NUMA_ENGINE_CONFIG and the data dir override)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decide which bills to pay, defer, or send for review
    Allocate {
        /// JSON file containing an array of bills
        #[arg(short, long)]
        bills: PathBuf,

        /// Budget available for this run (USD)
        #[arg(long)]
        budget: f64,

        /// Reference time (RFC 3339 or YYYY-MM-DD); defaults to now
        #[arg(long)]
        now: Option<String>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how each pending bill is classified and scored
    Score {
        /// JSON file containing an array of bills
        #[arg(short, long)]
        bills: PathBuf,

        /// Budget used for review flags (USD)
        #[arg(long, default_value = "500")]
        budget: f64,

        /// Reference time (RFC 3339 or YYYY-MM-DD); defaults to now
        #[arg(long)]
        now: Option<String>,
    },

    /// Classify a single vendor
    Classify {
        /// Vendor name
        #[arg(long)]
        vendor: String,

        /// Free-form category label
        #[arg(short, long)]
        category: Option<String>,

        /// Bill amount (USD); large amounts imply a plan tier
        #[arg(short, long, default_value = "0")]
        amount: f64,
    },

    /// Extract bill fields from a receipt image (needs ANTHROPIC_API_KEY)
    ParseReceipt {
        /// Image file (JPEG, PNG, GIF or WebP)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show the active engine configuration
    Config,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Daily spending limit for the in-memory ledger (USD)
        #[arg(long, default_value = "500")]
        daily_limit: f64,
    },
}
