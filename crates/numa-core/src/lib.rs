//! Numa Core Library
//!
//! Bill prioritization and budget allocation for the Numa agent CFO:
//! - Keyword classification into invoice types and plan tiers
//! - Priority scoring from type, urgency, criticality and tier
//! - Greedy budget allocation with human-review flags
//! - Advisory comparison notes and a readable explanation per run
//! - In-memory ledger with a daily budget and activity feed
//! - Pluggable receipt extraction from images
//!
//! The engine is pure: bills, budget and the reference time go in, an
//! [`AllocationResult`] comes out. Bill status is only changed by the
//! [`Ledger`].

pub mod analysis;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod explain;
pub mod ledger;
pub mod models;
pub mod receipt;
pub mod scoring;

pub use classify::{classify_invoice_type, detect_plan_tier, Classifier};
pub use config::{ConfigSource, EngineConfig, ReviewThresholds, TierThresholds};
pub use engine::{decide_bills, AllocationEngine};
pub use error::{Error, Result};
pub use ledger::{AppliedCounts, Ledger, DEFAULT_DAILY_LIMIT};
pub use models::{
    ActivityEntry, AllocationResult, Bill, BillAssessment, BillStatus, BudgetSummary,
    InvoiceType, NewBill, PlanTier, PriorityScore, ScoreBreakdown,
};
pub use receipt::{
    AnthropicVisionExtractor, ExtractedBill, ImageMediaType, MockExtractor, ReceiptExtractor,
    MAX_RECEIPT_BYTES,
};
pub use scoring::calculate_priority;
