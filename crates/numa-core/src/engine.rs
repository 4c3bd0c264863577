//! Allocation engine
//!
//! One run takes a snapshot of bills, a budget and a reference time and
//! partitions the pending bills into pay / defer / review:
//!
//! 1. keep pending bills only
//! 2. classify, score and flag each one for review
//! 3. sort by score (highest first), cheaper first on ties
//! 4. compare bills for advisory notes
//! 5. walk the sorted list once, paying what fits the remaining budget
//!
//! Runs are pure: no I/O, no clock reads, no shared state, and inputs are
//! never mutated. Invalid input fails the whole run before any work is done.

use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::analysis::compare_bills;
use crate::classify::Classifier;
use crate::config::{EngineConfig, ReviewThresholds};
use crate::error::{Error, Result};
use crate::explain::{build_explanation, ExplainedBill};
use crate::models::{AllocationResult, Bill, BillAssessment, InvoiceType, PlanTier};
use crate::scoring::calculate_priority;

/// A pending bill with everything the run derived for it
struct ScoredBill<'a> {
    bill: &'a Bill,
    assessment: BillAssessment,
}

impl<'a> ScoredBill<'a> {
    fn explained(&self) -> ExplainedBill<'a> {
        ExplainedBill {
            bill: self.bill,
            invoice_type: self.assessment.invoice_type,
            plan_tier: self.assessment.plan_tier,
        }
    }
}

/// Bill prioritization and budget allocation
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    classifier: Classifier,
    review: ReviewThresholds,
}

impl Default for AllocationEngine {
    fn default() -> Self {
        Self {
            classifier: Classifier::builtin().clone(),
            review: ReviewThresholds::default(),
        }
    }
}

impl AllocationEngine {
    /// Build an engine from a configuration
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: Classifier::new(config)?,
            review: config.review.clone(),
        })
    }

    /// Shared engine with the built-in configuration
    pub fn builtin() -> &'static AllocationEngine {
        static BUILTIN: OnceLock<AllocationEngine> = OnceLock::new();
        BUILTIN.get_or_init(AllocationEngine::default)
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Whether a bill must be confirmed by a human before payment
    ///
    /// Depends only on the bill itself, the run's budget and how many bills
    /// are pending; never on what happens to other bills.
    pub fn needs_review(
        &self,
        bill: &Bill,
        invoice_type: InvoiceType,
        plan_tier: PlanTier,
        budget: f64,
        pending_count: usize,
    ) -> bool {
        let t = &self.review;

        if bill.amount > budget * t.budget_share {
            return true;
        }
        if plan_tier == PlanTier::Enterprise && bill.amount > t.enterprise_amount {
            return true;
        }
        if invoice_type == InvoiceType::Food && bill.amount > t.food_amount {
            return true;
        }
        if pending_count > 0 {
            let fair_share = budget / pending_count as f64;
            if bill.amount > fair_share * t.fair_share_multiplier {
                return true;
            }
        }
        false
    }

    /// Everything the engine derives for one bill
    pub fn assess(
        &self,
        bill: &Bill,
        budget: f64,
        pending_count: usize,
        now: DateTime<Utc>,
    ) -> BillAssessment {
        let invoice_type = self.classifier.classify_invoice_type(bill);
        let plan_tier = self.classifier.detect_plan_tier(bill);
        let priority = calculate_priority(bill, invoice_type, plan_tier, now);

        BillAssessment {
            bill_id: bill.id.clone(),
            vendor: bill.vendor.clone(),
            amount: bill.amount,
            invoice_type,
            plan_tier,
            score: priority.score,
            breakdown: priority.breakdown,
            needs_review: self.needs_review(bill, invoice_type, plan_tier, budget, pending_count),
        }
    }

    /// Assessments of the pending bills in allocation order
    pub fn preview(
        &self,
        bills: &[Bill],
        budget: f64,
        now: DateTime<Utc>,
    ) -> Result<Vec<BillAssessment>> {
        validate_input(bills, budget)?;
        let pending: Vec<&Bill> = bills.iter().filter(|b| b.is_pending()).collect();
        Ok(self
            .score_sorted(&pending, budget, now)
            .into_iter()
            .map(|s| s.assessment)
            .collect())
    }

    /// Partition the pending bills into pay / defer / review
    pub fn allocate(
        &self,
        bills: &[Bill],
        budget: f64,
        now: DateTime<Utc>,
    ) -> Result<AllocationResult> {
        validate_input(bills, budget)?;

        let pending: Vec<&Bill> = bills.iter().filter(|b| b.is_pending()).collect();
        if pending.is_empty() {
            debug!(total = bills.len(), "No pending bills to evaluate");
            return Ok(AllocationResult::empty(budget));
        }

        let scored = self.score_sorted(&pending, budget, now);
        let comparison_notes = compare_bills(pending.iter().copied(), &self.classifier);

        // The walk keeps its balance in whole cents so bills that sum exactly
        // to the budget all fit
        let mut remaining_cents = to_cents(budget);
        let mut selected_cents: i64 = 0;
        let mut pay: Vec<&ScoredBill<'_>> = vec![];
        let mut defer: Vec<&ScoredBill<'_>> = vec![];
        let mut review: Vec<&ScoredBill<'_>> = vec![];

        for item in &scored {
            let cents = to_cents(item.bill.amount);
            if item.assessment.needs_review {
                review.push(item);
            } else if cents <= remaining_cents {
                remaining_cents -= cents;
                selected_cents += cents;
                pay.push(item);
            } else {
                defer.push(item);
            }
        }

        let total_selected = from_cents(selected_cents);
        let remaining = from_cents(remaining_cents);

        let explanation = build_explanation(
            budget,
            total_selected,
            remaining,
            &explain(&pay),
            &explain(&review),
            &explain(&defer),
        );

        debug!(
            pending = pending.len(),
            pay = pay.len(),
            defer = defer.len(),
            review = review.len(),
            budget,
            total_selected,
            remaining,
            "Allocation complete"
        );

        Ok(AllocationResult {
            to_pay: bills_of(&pay),
            to_defer: bills_of(&defer),
            to_review: bills_of(&review),
            explanation,
            comparison_notes,
            total_selected,
            remaining_budget: remaining,
        })
    }

    /// Score every pending bill and sort: score descending, amount ascending
    ///
    /// The sort is stable, so fully tied bills keep their input order.
    fn score_sorted<'a>(
        &self,
        pending: &[&'a Bill],
        budget: f64,
        now: DateTime<Utc>,
    ) -> Vec<ScoredBill<'a>> {
        let mut scored: Vec<ScoredBill<'a>> = pending
            .iter()
            .map(|&bill| ScoredBill {
                bill,
                assessment: self.assess(bill, budget, pending.len(), now),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.assessment
                .score
                .cmp(&a.assessment.score)
                .then_with(|| a.bill.amount.total_cmp(&b.bill.amount))
        });

        scored
    }
}

/// Dollars to whole cents, rounding half away from zero
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

fn explain<'a>(items: &[&ScoredBill<'a>]) -> Vec<ExplainedBill<'a>> {
    items.iter().map(|s| s.explained()).collect()
}

fn bills_of(items: &[&ScoredBill<'_>]) -> Vec<Bill> {
    items.iter().map(|s| s.bill.clone()).collect()
}

/// Reject input the engine will not evaluate
///
/// Every bill is checked, pending or not, so a bad record is reported even
/// when it would have been filtered out.
pub fn validate_input(bills: &[Bill], budget: f64) -> Result<()> {
    if !budget.is_finite() {
        return Err(Error::InvalidInput(format!(
            "budget must be a finite number, got {}",
            budget
        )));
    }
    if budget < 0.0 {
        return Err(Error::InvalidInput(format!(
            "budget must not be negative, got {}",
            budget
        )));
    }

    let mut seen = HashSet::with_capacity(bills.len());
    for bill in bills {
        if !bill.amount.is_finite() {
            return Err(Error::InvalidInput(format!(
                "bill {} ({}) has a non-finite amount",
                bill.id, bill.vendor
            )));
        }
        if bill.amount < 0.0 {
            return Err(Error::InvalidInput(format!(
                "bill {} ({}) has a negative amount: {}",
                bill.id, bill.vendor, bill.amount
            )));
        }
        if !seen.insert(bill.id.as_str()) {
            return Err(Error::InvalidInput(format!(
                "duplicate bill id: {}",
                bill.id
            )));
        }
    }

    Ok(())
}

/// Allocate with the built-in configuration
pub fn decide_bills(bills: &[Bill], budget: f64, now: DateTime<Utc>) -> Result<AllocationResult> {
    AllocationEngine::builtin().allocate(bills, budget, now)
}
