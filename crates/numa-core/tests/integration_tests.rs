//! Integration tests for numa-core
//!
//! These tests exercise full allocation runs end to end: classification,
//! scoring, review flags, greedy allocation and the ledger that applies it.

use chrono::{DateTime, TimeZone, Utc};
use numa_core::engine::to_cents;
use numa_core::{
    decide_bills, AllocationEngine, Bill, BillStatus, EngineConfig, InvoiceType, Ledger, NewBill,
    PlanTier,
};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 20, 12, 0, 0).unwrap()
}

fn bill(id: &str, vendor: &str, category: &str, amount: f64, due: Option<&str>) -> Bill {
    Bill {
        id: id.to_string(),
        vendor: vendor.to_string(),
        amount,
        due_date: due.map(String::from),
        status: BillStatus::Pending,
        category: Some(category.to_string()),
    }
}

fn ids(bills: &[Bill]) -> Vec<&str> {
    bills.iter().map(|b| b.id.as_str()).collect()
}

/// A realistic day of startup bills
fn startup_bills() -> Vec<Bill> {
    vec![
        bill("aws", "AWS", "Infra", 120.0, Some("2025-11-20")),
        bill("openai", "OpenAI", "API", 100.0, Some("2025-11-20")),
        bill("github", "GitHub", "SaaS", 21.0, Some("2025-11-25")),
        bill("vercel", "Vercel", "Hosting", 20.0, Some("2025-11-22")),
        bill("lunch", "Team Lunch", "Food", 90.0, Some("2025-12-10")),
        bill("wework", "WeWork", "Workspace", 45.0, Some("2025-12-01")),
    ]
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_large_critical_bill_held_for_review() {
    let bills = vec![bill("aws", "AWS", "Infra", 1000.0, Some("2025-11-20"))];
    let engine = AllocationEngine::default();

    let assessment = engine.assess(&bills[0], 500.0, 1, now());
    assert_eq!(assessment.score, 175);

    let result = engine.allocate(&bills, 500.0, now()).unwrap();
    assert_eq!(ids(&result.to_review), vec!["aws"]);
    assert!(result.to_pay.is_empty());
    assert_eq!(result.remaining_budget, 500.0);
    assert!(result.explanation.contains("REQUIRES REVIEW (1 bills)"));
}

#[test]
fn test_critical_bills_paid_before_food() {
    let bills = vec![
        bill("aws", "AWS", "Infra", 120.0, Some("2025-11-20")),
        bill("openai", "OpenAI", "API", 100.0, Some("2025-11-20")),
        bill("lunch", "Team Lunch", "Food", 90.0, Some("2025-12-10")),
    ];
    let result = decide_bills(&bills, 300.0, now()).unwrap();

    assert_eq!(ids(&result.to_pay), vec!["aws", "openai"]);
    assert_eq!(ids(&result.to_defer), vec!["lunch"]);
    assert_eq!(result.remaining_budget, 80.0);
}

#[test]
fn test_small_budget_review_rule_wins() {
    // Both bills exceed half of a 150 budget, so both need a human
    let bills = vec![
        bill("openai", "OpenAI", "API", 100.0, Some("2025-11-20")),
        bill("lunch", "Team Lunch", "Food", 80.0, Some("2025-12-10")),
    ];
    let result = decide_bills(&bills, 150.0, now()).unwrap();

    assert_eq!(ids(&result.to_review), vec!["openai", "lunch"]);
    assert!(result.to_pay.is_empty());
    assert!(result.to_defer.is_empty());
}

#[test]
fn test_nothing_pending() {
    let mut paid = bill("aws", "AWS", "Infra", 100.0, None);
    paid.status = BillStatus::Paid;
    let result = decide_bills(&[paid], 500.0, now()).unwrap();

    assert_eq!(result.evaluated_count(), 0);
    assert_eq!(result.explanation, "No pending bills to evaluate.");
    assert_eq!(result.remaining_budget, 500.0);
}

#[test]
fn test_enterprise_workspace() {
    let b = bill("ww", "WeWork Enterprise", "Workspace", 600.0, None);
    let assessment = AllocationEngine::default().assess(&b, 1000.0, 1, now());

    assert_eq!(assessment.invoice_type, InvoiceType::Workspace);
    assert_eq!(assessment.plan_tier, PlanTier::Enterprise);
    assert!(assessment.needs_review);
}

#[test]
fn test_startup_day() {
    let bills = startup_bills();
    let result = decide_bills(&bills, 400.0, now()).unwrap();

    // Fair share is 400 / 6 * 2 = 133.33, nothing is large enough to need review
    assert!(result.to_review.is_empty());
    assert_eq!(
        ids(&result.to_pay),
        vec!["aws", "openai", "vercel", "github", "wework", "lunch"]
    );
    assert_eq!(result.total_selected, 396.0);
    assert_eq!(result.remaining_budget, 4.0);
    assert!(result.explanation.contains("✅ APPROVED (6 bills):"));
    assert!(result.explanation.contains("  INFRASTRUCTURE: $140.00 - AWS ($120), Vercel ($20)"));
}

#[test]
fn test_tight_budget_skips_to_cheaper_bills() {
    let bills = startup_bills();
    let result = decide_bills(&bills, 250.0, now()).unwrap();

    // Fair share is 250 / 6 * 2 = 83.33; AWS, OpenAI and lunch all exceed it
    assert_eq!(ids(&result.to_review), vec!["aws", "openai", "lunch"]);
    assert_eq!(ids(&result.to_pay), vec!["vercel", "github", "wework"]);
    assert_eq!(result.remaining_budget, 164.0);
}

#[test]
fn test_comparison_notes_surface() {
    let bills = vec![
        bill("openai", "OpenAI", "API", 150.0, Some("2025-11-20")),
        bill("anthropic", "Anthropic", "API", 90.0, Some("2025-11-20")),
        bill("party", "Offsite party", "Food", 95.0, None),
    ];
    let result = decide_bills(&bills, 5000.0, now()).unwrap();

    assert_eq!(result.comparison_notes.len(), 2);
    assert!(result.comparison_notes[0].contains("$240.00"));
    assert!(result.comparison_notes[1].contains("Team expenses ($95.00)"));
}

#[test]
fn test_custom_config_changes_outcome() {
    let config = EngineConfig::from_toml(
        r#"
        [review]
        budget_share = 1.0
        fair_share_multiplier = 100.0
        "#,
    )
    .unwrap();
    let engine = AllocationEngine::new(&config).unwrap();

    let bills = vec![
        bill("openai", "OpenAI", "API", 100.0, Some("2025-11-20")),
        bill("lunch", "Team Lunch", "Food", 80.0, Some("2025-12-10")),
    ];
    let result = engine.allocate(&bills, 150.0, now()).unwrap();
    assert_eq!(ids(&result.to_pay), vec!["openai"]);
    assert_eq!(ids(&result.to_defer), vec!["lunch"]);
}

// =============================================================================
// Invalid input
// =============================================================================

#[test]
fn test_invalid_input_fails_whole_run() {
    let mut bills = startup_bills();
    bills.push(bill("bad", "Broken", "SaaS", f64::NAN, None));
    assert!(decide_bills(&bills, 500.0, now()).unwrap_err().is_invalid_input());

    let mut bills = startup_bills();
    bills.push(bill("aws", "AWS again", "Infra", 1.0, None));
    assert!(decide_bills(&bills, 500.0, now()).unwrap_err().is_invalid_input());

    assert!(decide_bills(&startup_bills(), -10.0, now())
        .unwrap_err()
        .is_invalid_input());
}

// =============================================================================
// Ledger workflow
// =============================================================================

#[test]
fn test_ledger_agent_workflow() {
    let mut ledger = Ledger::new(300.0).unwrap();
    for b in [
        ("Team Lunch", "Food", 90.0, "2025-12-10"),
        ("OpenAI", "API", 100.0, "2025-11-20"),
        ("AWS", "Infra", 120.0, "2025-11-20"),
    ] {
        ledger
            .add_bill(NewBill {
                vendor: b.0.into(),
                amount: b.2,
                due_date: Some(b.3.into()),
                category: Some(b.1.into()),
            })
            .unwrap();
    }

    let preview = AllocationEngine::default()
        .preview(ledger.bills(), ledger.summary().remaining, now())
        .unwrap();
    assert_eq!(preview[0].vendor, "AWS");
    assert_eq!(preview[0].score, 165);
    assert_eq!(preview[2].vendor, "Team Lunch");

    let result = ledger.run_agent(&AllocationEngine::default(), None, now()).unwrap();
    assert_eq!(result.to_pay.len(), 2);

    let summary = ledger.summary();
    assert_eq!(summary.spent_today, 220.0);
    assert_eq!(summary.remaining, 80.0);
    assert_eq!(summary.percent_used, 73);

    let statuses: Vec<BillStatus> = ledger.bills().iter().map(|b| b.status).collect();
    assert!(statuses.iter().all(|s| *s != BillStatus::Pending));
}

// =============================================================================
// Properties
// =============================================================================

const VENDORS: &[(&str, &str)] = &[
    ("AWS", "Infra"),
    ("OpenAI", "API"),
    ("GitHub", "SaaS"),
    ("WeWork", "Workspace"),
    ("Team Lunch", "Food"),
    ("Acme Legal", "Consulting"),
    ("Slack", "Enterprise plan"),
    ("Zoom", "Basic"),
];

const DUE_DATES: &[Option<&str>] = &[
    None,
    Some("2025-11-18"),
    Some("2025-11-20"),
    Some("2025-11-21"),
    Some("2025-11-26"),
    Some("2025-12-02"),
    Some("2026-01-15"),
    Some("not a date"),
];

fn arb_bills() -> impl Strategy<Value = Vec<Bill>> {
    prop::collection::vec(
        (
            0..VENDORS.len(),
            0_u32..200_000,
            0..DUE_DATES.len(),
            0_u8..3,
        ),
        0..12,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (v, cents, d, s))| Bill {
                id: format!("bill-{}", i),
                vendor: VENDORS[v].0.to_string(),
                amount: f64::from(cents) / 100.0,
                due_date: DUE_DATES[d].map(String::from),
                status: match s {
                    0 | 1 => BillStatus::Pending,
                    _ => BillStatus::Paid,
                },
                category: Some(VENDORS[v].1.to_string()),
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn allocation_partitions_pending_bills(bills in arb_bills(), budget_cents in 0_u32..500_000) {
        let budget = f64::from(budget_cents) / 100.0;
        let result = decide_bills(&bills, budget, now()).unwrap();

        let mut placed: Vec<&str> = ids(&result.to_pay);
        placed.extend(ids(&result.to_defer));
        placed.extend(ids(&result.to_review));
        placed.sort_unstable();

        let mut pending: Vec<&str> = bills
            .iter()
            .filter(|b| b.status == BillStatus::Pending)
            .map(|b| b.id.as_str())
            .collect();
        pending.sort_unstable();

        prop_assert_eq!(placed, pending);
    }

    #[test]
    fn allocation_never_overspends(bills in arb_bills(), budget_cents in 0_u32..500_000) {
        let budget = f64::from(budget_cents) / 100.0;
        let result = decide_bills(&bills, budget, now()).unwrap();

        let paid: f64 = result.to_pay.iter().map(|b| b.amount).sum();
        let paid_cents: i64 = result.to_pay.iter().map(|b| to_cents(b.amount)).sum();
        prop_assert!(paid_cents <= i64::from(budget_cents));
        prop_assert_eq!(to_cents(result.remaining_budget), i64::from(budget_cents) - paid_cents);
        prop_assert!(paid <= budget + 1e-6);
        prop_assert!((result.total_selected - paid).abs() < 1e-6);
        prop_assert!((result.remaining_budget - (budget - paid)).abs() < 1e-6);
        prop_assert!(result.remaining_budget >= -1e-6);
    }

    #[test]
    fn review_bills_never_paid_or_deferred(bills in arb_bills(), budget_cents in 0_u32..500_000) {
        let budget = f64::from(budget_cents) / 100.0;
        let engine = AllocationEngine::default();
        let result = engine.allocate(&bills, budget, now()).unwrap();
        let assessments = engine.preview(&bills, budget, now()).unwrap();

        for a in &assessments {
            let in_review = result.to_review.iter().any(|b| b.id == a.bill_id);
            prop_assert_eq!(a.needs_review, in_review);
        }
    }

    #[test]
    fn deferred_bills_did_not_fit(bills in arb_bills(), budget_cents in 0_u32..500_000) {
        let budget = f64::from(budget_cents) / 100.0;
        let result = decide_bills(&bills, budget, now()).unwrap();

        // Remaining only shrinks during the walk, so a deferred bill must
        // exceed what was left at the end
        for b in &result.to_defer {
            prop_assert!(b.amount > result.remaining_budget);
        }
    }

    #[test]
    fn allocation_is_deterministic(bills in arb_bills(), budget_cents in 0_u32..500_000) {
        let budget = f64::from(budget_cents) / 100.0;
        let a = decide_bills(&bills, budget, now()).unwrap();
        let b = decide_bills(&bills, budget, now()).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn preview_order_is_sorted(bills in arb_bills()) {
        let assessments = AllocationEngine::default().preview(&bills, 1000.0, now()).unwrap();
        for pair in assessments.windows(2) {
            let (x, y) = (&pair[0], &pair[1]);
            prop_assert!(x.score > y.score || (x.score == y.score && x.amount <= y.amount));
        }
    }
}
