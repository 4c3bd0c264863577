//! In-memory bill ledger with a daily budget and an activity feed
//!
//! Owns bill status. The engine only proposes; [`Ledger::apply_allocation`]
//! is where a proposal turns into paid and deferred bills.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::engine::AllocationEngine;
use crate::error::{Error, Result};
use crate::models::{
    ActivityEntry, AllocationResult, Bill, BillStatus, BudgetSummary, NewBill,
};

/// Daily spending limit of a fresh ledger
pub const DEFAULT_DAILY_LIMIT: f64 = 500.0;

/// How many bills an applied allocation changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedCounts {
    pub paid: usize,
    pub deferred: usize,
    pub held_for_review: usize,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    daily_limit: f64,
    /// Newest first
    bills: Vec<Bill>,
    /// Newest first
    activity: Vec<ActivityEntry>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            daily_limit: DEFAULT_DAILY_LIMIT,
            bills: vec![],
            activity: vec![],
        }
    }
}

impl Ledger {
    pub fn new(daily_limit: f64) -> Result<Self> {
        validate_limit(daily_limit)?;
        Ok(Self {
            daily_limit,
            ..Self::default()
        })
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn bill(&self, id: &str) -> Option<&Bill> {
        self.bills.iter().find(|b| b.id == id)
    }

    pub fn activity(&self) -> &[ActivityEntry] {
        &self.activity
    }

    pub fn daily_limit(&self) -> f64 {
        self.daily_limit
    }

    /// Record a new pending bill
    pub fn add_bill(&mut self, input: NewBill) -> Result<Bill> {
        if input.vendor.trim().is_empty() {
            return Err(Error::InvalidInput("vendor must not be empty".into()));
        }
        if !input.amount.is_finite() || input.amount < 0.0 {
            return Err(Error::InvalidInput(format!(
                "amount must be a non-negative number, got {}",
                input.amount
            )));
        }

        let bill = Bill::from_new(input);
        let message = match bill.due_date.as_deref() {
            Some(due) => format!(
                "Created bill for {} (${}) due on {}.",
                bill.vendor, bill.amount, due
            ),
            None => format!("Created bill for {} (${}).", bill.vendor, bill.amount),
        };
        debug!(id = %bill.id, vendor = %bill.vendor, amount = bill.amount, "Bill added");

        self.bills.insert(0, bill.clone());
        self.log(message);
        Ok(bill)
    }

    pub fn mark_paid(&mut self, id: &str) -> Result<Bill> {
        let bill = self.set_status(id, BillStatus::Paid)?;
        self.log(format!(
            "Marked {} bill for ${} as PAID.",
            bill.vendor, bill.amount
        ));
        Ok(bill)
    }

    pub fn mark_deferred(&mut self, id: &str) -> Result<Bill> {
        let bill = self.set_status(id, BillStatus::Deferred)?;
        self.log(format!("Deferred {} bill for ${}.", bill.vendor, bill.amount));
        Ok(bill)
    }

    pub fn set_daily_limit(&mut self, limit: f64) -> Result<()> {
        validate_limit(limit)?;
        self.daily_limit = limit;
        self.log(format!("Updated daily budget to ${}.", limit));
        Ok(())
    }

    /// Spend against today's limit
    ///
    /// Every paid bill counts as spent today; there is no day rollover.
    pub fn summary(&self) -> BudgetSummary {
        let spent: f64 = self
            .bills
            .iter()
            .filter(|b| b.status == BillStatus::Paid)
            .map(|b| b.amount)
            .sum();

        let percent_used = if self.daily_limit > 0.0 {
            (spent / self.daily_limit * 100.0).round().min(100.0) as u8
        } else {
            0
        };

        BudgetSummary {
            daily_limit: self.daily_limit,
            spent_today: spent,
            remaining: (self.daily_limit - spent).max(0.0),
            percent_used,
        }
    }

    /// Apply an engine decision: pay `to_pay`, defer `to_defer`
    ///
    /// Bills held for review stay pending. Ids the ledger does not know are
    /// skipped with a debug log, since the result may come from another
    /// snapshot.
    pub fn apply_allocation(&mut self, result: &AllocationResult) -> AppliedCounts {
        let mut counts = AppliedCounts {
            held_for_review: result.to_review.len(),
            ..AppliedCounts::default()
        };

        for bill in &result.to_pay {
            match self.set_status(&bill.id, BillStatus::Paid) {
                Ok(_) => counts.paid += 1,
                Err(e) => debug!(id = %bill.id, error = %e, "Skipping unknown bill"),
            }
        }
        for bill in &result.to_defer {
            match self.set_status(&bill.id, BillStatus::Deferred) {
                Ok(_) => counts.deferred += 1,
                Err(e) => debug!(id = %bill.id, error = %e, "Skipping unknown bill"),
            }
        }

        counts
    }

    /// Allocate a budget over the pending bills and apply it
    ///
    /// `budget` caps this run; without it the remaining daily budget is used.
    pub fn run_agent(
        &mut self,
        engine: &AllocationEngine,
        budget: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<AllocationResult> {
        let budget = budget.unwrap_or_else(|| self.summary().remaining);
        let result = engine.allocate(&self.bills, budget, now)?;
        let counts = self.apply_allocation(&result);

        info!(
            budget,
            paid = counts.paid,
            deferred = counts.deferred,
            review = counts.held_for_review,
            "Agent run applied"
        );
        self.log(format!(
            "Agent run with ${:.2}: paid {} (${:.2}), deferred {}, {} held for review.",
            budget,
            counts.paid,
            result.total_selected,
            counts.deferred,
            counts.held_for_review
        ));

        Ok(result)
    }

    fn set_status(&mut self, id: &str, status: BillStatus) -> Result<Bill> {
        let bill = self
            .bills
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| Error::NotFound(format!("bill {}", id)))?;
        bill.status = status;
        Ok(bill.clone())
    }

    fn log(&mut self, message: String) {
        self.activity.insert(
            0,
            ActivityEntry {
                time: Utc::now(),
                message,
            },
        );
    }
}

fn validate_limit(limit: f64) -> Result<()> {
    if !limit.is_finite() || limit < 0.0 {
        return Err(Error::InvalidInput(format!(
            "daily limit must be a non-negative number, got {}",
            limit
        )));
    }
    Ok(())
}
