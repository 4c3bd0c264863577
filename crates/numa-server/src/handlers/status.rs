//! Health, dashboard and activity handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppError, AppState};
use numa_core::{ActivityEntry, Bill, BudgetSummary};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Receipt extraction backend, if any
    pub extractor: Option<String>,
}

/// Everything the dashboard renders
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub budget: BudgetSummary,
    pub bills: Vec<Bill>,
    pub activity: Vec<ActivityEntry>,
}

/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        extractor: state.extractor.as_ref().map(|e| e.name().to_string()),
    })
}

/// GET /api/dashboard - Budget summary, bills and activity in one call
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardResponse>, AppError> {
    let ledger = state.ledger.read().await;
    Ok(Json(DashboardResponse {
        budget: ledger.summary(),
        bills: ledger.bills().to_vec(),
        activity: ledger.activity().to_vec(),
    }))
}

/// GET /api/activity - Activity feed, newest first
pub async fn list_activity(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ActivityEntry>>, AppError> {
    let ledger = state.ledger.read().await;
    Ok(Json(ledger.activity().to_vec()))
}
