//! Priority scoring
//!
//! `score = max(0, base_priority + urgency + criticality + plan_bonus)`.
//! The reference time is always passed in; nothing here reads the clock.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

use crate::models::{Bill, InvoiceType, PlanTier, PriorityScore, ScoreBreakdown};

/// Bonus for infrastructure and API bills
pub const CRITICAL_SERVICE_BONUS: i32 = 15;
/// Penalty for food bills above [`EXPENSIVE_FOOD_AMOUNT`]
pub const EXPENSIVE_FOOD_PENALTY: i32 = -10;
pub const EXPENSIVE_FOOD_AMOUNT: f64 = 50.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Base priority by invoice type
pub fn base_priority(invoice_type: InvoiceType) -> i32 {
    match invoice_type {
        InvoiceType::Infrastructure => 100,
        InvoiceType::Api => 95,
        InvoiceType::Saas => 70,
        InvoiceType::Workspace => 60,
        InvoiceType::Other => 50,
        InvoiceType::Food => 20,
    }
}

/// Score adjustment by plan tier
pub fn plan_bonus(tier: PlanTier) -> i32 {
    match tier {
        PlanTier::Enterprise => 20,
        PlanTier::Pro => 10,
        PlanTier::Team => 5,
        PlanTier::Individual => -5,
        PlanTier::Unknown => 0,
    }
}

/// Criticality adjustment
pub fn criticality(invoice_type: InvoiceType, amount: f64) -> i32 {
    if invoice_type.is_critical() {
        CRITICAL_SERVICE_BONUS
    } else if invoice_type == InvoiceType::Food && amount > EXPENSIVE_FOOD_AMOUNT {
        EXPENSIVE_FOOD_PENALTY
    } else {
        0
    }
}

/// Parse a due date string
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD` (taken as UTC midnight) and
/// `YYYY-MM-DDTHH:MM:SS` (taken as UTC). Anything else is `None`.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }

    None
}

/// Fractional days from `now` until `due` (negative when overdue)
pub fn days_until(due: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (due - now).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Urgency points for a number of days until due
pub fn urgency_for_days(diff_days: f64) -> i32 {
    if diff_days <= 0.0 {
        40
    } else if diff_days <= 2.0 {
        30
    } else if diff_days <= 7.0 {
        20
    } else if diff_days <= 14.0 {
        10
    } else {
        0
    }
}

/// Urgency points for a bill's due date; missing or unparseable dates score 0
pub fn urgency(due_date: Option<&str>, now: DateTime<Utc>) -> i32 {
    let Some(raw) = due_date else {
        return 0;
    };
    match parse_due_date(raw) {
        Some(due) => urgency_for_days(days_until(due, now)),
        None => {
            debug!(due_date = raw, "Unparseable due date, no urgency");
            0
        }
    }
}

/// Score a bill whose type and tier are already known
pub fn calculate_priority(
    bill: &Bill,
    invoice_type: InvoiceType,
    plan_tier: PlanTier,
    now: DateTime<Utc>,
) -> PriorityScore {
    let breakdown = ScoreBreakdown {
        base_priority: base_priority(invoice_type),
        urgency: urgency(bill.due_date.as_deref(), now),
        criticality: criticality(invoice_type, bill.amount),
        plan_bonus: plan_bonus(plan_tier),
    };

    PriorityScore {
        score: breakdown.total().max(0) as u32,
        breakdown,
    }
}
