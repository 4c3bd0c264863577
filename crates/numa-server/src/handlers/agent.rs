//! Agent handlers: dry-run previews and applied runs

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::read_json_or_default;
use crate::{AppError, AppState};
use numa_core::{AllocationResult, BillAssessment, BudgetSummary};

/// Optional overrides for a preview
#[derive(Debug, Default, Deserialize)]
pub struct PreviewRequest {
    /// Defaults to the remaining daily budget
    pub budget: Option<f64>,
    /// Reference time; defaults to the server clock
    pub now: Option<DateTime<Utc>>,
}

/// Optional overrides for a run
#[derive(Debug, Default, Deserialize)]
pub struct RunRequest {
    /// Caps this run; defaults to the remaining daily budget
    pub budget: Option<f64>,
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub result: AllocationResult,
    /// Pending bills in allocation order
    pub assessments: Vec<BillAssessment>,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub result: AllocationResult,
    pub budget: BudgetSummary,
}

/// POST /api/agent/preview - What the agent would do, without changing anything
pub async fn preview_agent(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<PreviewResponse>, AppError> {
    let req: PreviewRequest = read_json_or_default(request).await?;
    let now = req.now.unwrap_or_else(Utc::now);

    let ledger = state.ledger.read().await;
    let budget = req.budget.unwrap_or_else(|| ledger.summary().remaining);

    let result = state.engine.allocate(ledger.bills(), budget, now)?;
    let assessments = state.engine.preview(ledger.bills(), budget, now)?;

    Ok(Json(PreviewResponse {
        result,
        assessments,
    }))
}

/// POST /api/agent/run - Allocate the budget and apply the decision
pub async fn run_agent(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<RunResponse>, AppError> {
    let req: RunRequest = read_json_or_default(request).await?;
    let now = req.now.unwrap_or_else(Utc::now);

    let mut ledger = state.ledger.write().await;
    let result = ledger.run_agent(&state.engine, req.budget, now)?;

    info!(
        paid = result.to_pay.len(),
        deferred = result.to_defer.len(),
        review = result.to_review.len(),
        "Agent run complete"
    );

    Ok(Json(RunResponse {
        result,
        budget: ledger.summary(),
    }))
}
