//! Bill handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::{AppError, AppState};
use numa_core::{Bill, NewBill};

/// GET /api/bills - List all bills, newest first
pub async fn list_bills(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Bill>>, AppError> {
    let ledger = state.ledger.read().await;
    Ok(Json(ledger.bills().to_vec()))
}

/// POST /api/bills - Create a pending bill
pub async fn create_bill(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewBill>,
) -> Result<Json<Bill>, AppError> {
    let bill = state.ledger.write().await.add_bill(req)?;
    info!(id = %bill.id, vendor = %bill.vendor, amount = bill.amount, "Bill created");
    Ok(Json(bill))
}

/// POST /api/bills/:id/paid - Mark a bill as paid
pub async fn mark_bill_paid(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Bill>, AppError> {
    let bill = state.ledger.write().await.mark_paid(&id)?;
    Ok(Json(bill))
}

/// POST /api/bills/:id/defer - Defer a bill
pub async fn defer_bill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Bill>, AppError> {
    let bill = state.ledger.write().await.mark_deferred(&id)?;
    Ok(Json(bill))
}
