//! Daily budget handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{AppError, AppState};
use numa_core::BudgetSummary;

/// Request body for changing the daily limit
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetRequest {
    pub daily_limit: f64,
}

/// PUT /api/budget - Set the daily spending limit
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateBudgetRequest>,
) -> Result<Json<BudgetSummary>, AppError> {
    let mut ledger = state.ledger.write().await;
    ledger.set_daily_limit(req.daily_limit)?;
    Ok(Json(ledger.summary()))
}
