//! Domain models for Numa

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A payable obligation
///
/// Field names follow the dashboard's wire shape (`dueDate`), so bill files
/// exported from the dashboard load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub vendor: String,
    /// USD, dollars with cents precision
    pub amount: f64,
    /// Calendar date string; may be absent or unparseable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub status: BillStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Bill {
    /// Create a pending bill with a fresh random id
    pub fn from_new(input: NewBill) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            vendor: input.vendor,
            amount: input.amount,
            due_date: input.due_date,
            status: BillStatus::Pending,
            category: input.category,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == BillStatus::Pending
    }
}

/// Input for creating a bill (manual entry or receipt extraction)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBill {
    pub vendor: String,
    pub amount: f64,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Bill lifecycle status. Only collaborators change it; the engine never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Paid,
    Deferred,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Deferred => "deferred",
        }
    }
}

impl std::str::FromStr for BillStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "deferred" => Ok(Self::Deferred),
            _ => Err(format!("Unknown bill status: {}", s)),
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of spend a bill represents (derived, never stored)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    /// Cloud, hosting, compute, storage, domains
    Infrastructure,
    /// AI model and API usage
    Api,
    /// Productivity tools
    Saas,
    /// Office space and desks
    Workspace,
    /// Team meals, swag, events
    Food,
    Other,
}

impl InvoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Infrastructure => "infrastructure",
            Self::Api => "api",
            Self::Saas => "saas",
            Self::Workspace => "workspace",
            Self::Food => "food",
            Self::Other => "other",
        }
    }

    /// Services the company cannot run without
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Infrastructure | Self::Api)
    }

    pub fn all() -> &'static [InvoiceType] {
        &[
            Self::Infrastructure,
            Self::Api,
            Self::Saas,
            Self::Workspace,
            Self::Food,
            Self::Other,
        ]
    }
}

impl std::str::FromStr for InvoiceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "infrastructure" | "infra" => Ok(Self::Infrastructure),
            "api" => Ok(Self::Api),
            "saas" => Ok(Self::Saas),
            "workspace" => Ok(Self::Workspace),
            "food" => Ok(Self::Food),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown invoice type: {}", s)),
        }
    }
}

impl std::fmt::Display for InvoiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subscription tier inferred from text and amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Enterprise,
    Pro,
    Team,
    Individual,
    Unknown,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enterprise => "enterprise",
            Self::Pro => "pro",
            Self::Team => "team",
            Self::Individual => "individual",
            Self::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enterprise" => Ok(Self::Enterprise),
            "pro" => Ok(Self::Pro),
            "team" => Ok(Self::Team),
            "individual" => Ok(Self::Individual),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Unknown plan tier: {}", s)),
        }
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Additive parts of a priority score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub base_priority: i32,
    pub urgency: i32,
    pub criticality: i32,
    pub plan_bonus: i32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.base_priority + self.urgency + self.criticality + self.plan_bonus
    }
}

/// Priority score of a bill, never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityScore {
    pub score: u32,
    pub breakdown: ScoreBreakdown,
}

/// Read-only view of how the engine sees one pending bill
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillAssessment {
    pub bill_id: String,
    pub vendor: String,
    pub amount: f64,
    pub invoice_type: InvoiceType,
    pub plan_tier: PlanTier,
    pub score: u32,
    pub breakdown: ScoreBreakdown,
    pub needs_review: bool,
}

/// Outcome of one allocation run
///
/// `to_pay`, `to_defer` and `to_review` partition the pending bills of the
/// input; non-pending bills never appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    pub to_pay: Vec<Bill>,
    pub to_defer: Vec<Bill>,
    /// Held for human confirmation; never auto-paid or auto-deferred
    pub to_review: Vec<Bill>,
    pub explanation: String,
    pub comparison_notes: Vec<String>,
    pub total_selected: f64,
    pub remaining_budget: f64,
}

impl AllocationResult {
    /// Result of a run with nothing to evaluate
    pub fn empty(budget: f64) -> Self {
        Self {
            to_pay: vec![],
            to_defer: vec![],
            to_review: vec![],
            explanation: "No pending bills to evaluate.".to_string(),
            comparison_notes: vec![],
            total_selected: 0.0,
            remaining_budget: budget,
        }
    }

    /// Number of bills the run placed in any list
    pub fn evaluated_count(&self) -> usize {
        self.to_pay.len() + self.to_defer.len() + self.to_review.len()
    }
}

/// Daily budget state shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub daily_limit: f64,
    pub spent_today: f64,
    pub remaining: f64,
    /// 0-100
    pub percent_used: u8,
}

/// One line of the activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub time: DateTime<Utc>,
    pub message: String,
}
