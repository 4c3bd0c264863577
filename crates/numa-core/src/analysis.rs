//! Advisory notes comparing the pending bills against each other
//!
//! Notes never change what gets paid, deferred or reviewed.

use crate::classify::Classifier;
use crate::models::{Bill, InvoiceType, PlanTier};

/// API spend above this is flagged
pub const HIGH_API_TOTAL: f64 = 200.0;
/// More infrastructure bills than this suggests consolidation
pub const MAX_INFRA_BILLS: usize = 3;
/// Food spend must exceed this before it is compared at all
pub const FOOD_TOTAL_FLOOR: f64 = 50.0;
/// Food spend above this share of critical spend is flagged
pub const FOOD_TO_CRITICAL_RATIO: f64 = 0.2;
/// Enterprise-tier spend above this is flagged
pub const ENTERPRISE_TOTAL: f64 = 500.0;

/// Per-type totals over a set of bills
#[derive(Debug, Clone, Copy, Default)]
struct TypeTotals {
    api: f64,
    infrastructure: f64,
    infrastructure_count: usize,
    food: f64,
    enterprise: f64,
}

/// Produce advisory notes for a set of bills, in fixed check order
pub fn compare_bills<'a>(
    bills: impl IntoIterator<Item = &'a Bill>,
    classifier: &Classifier,
) -> Vec<String> {
    let mut totals = TypeTotals::default();

    for bill in bills {
        match classifier.classify_invoice_type(bill) {
            InvoiceType::Api => totals.api += bill.amount,
            InvoiceType::Infrastructure => {
                totals.infrastructure += bill.amount;
                totals.infrastructure_count += 1;
            }
            InvoiceType::Food => totals.food += bill.amount,
            _ => {}
        }
        if classifier.detect_plan_tier(bill) == PlanTier::Enterprise {
            totals.enterprise += bill.amount;
        }
    }

    let mut notes = vec![];

    if totals.api > HIGH_API_TOTAL {
        notes.push(format!(
            "⚠️ High API costs detected: ${:.2}. Consider usage optimization.",
            totals.api
        ));
    }

    if totals.infrastructure_count > MAX_INFRA_BILLS {
        notes.push(format!(
            "📊 Multiple infrastructure bills ({}). Review for consolidation opportunities.",
            totals.infrastructure_count
        ));
    }

    let critical_total = totals.infrastructure + totals.api;
    if totals.food > FOOD_TOTAL_FLOOR && totals.food > critical_total * FOOD_TO_CRITICAL_RATIO {
        notes.push(format!(
            "🍽️ Team expenses (${:.2}) are significant compared to critical services. Consider deferring non-essential team events.",
            totals.food
        ));
    }

    if totals.enterprise > ENTERPRISE_TOTAL {
        notes.push(
            "💼 Enterprise plans detected. Confirm these are essential for operations before approval."
                .to_string(),
        );
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BillStatus;

    fn bill(vendor: &str, category: &str, amount: f64) -> Bill {
        Bill {
            id: format!("{}-{}", vendor, amount),
            vendor: vendor.to_string(),
            amount,
            due_date: None,
            status: BillStatus::Pending,
            category: Some(category.to_string()),
        }
    }

    fn notes(bills: &[Bill]) -> Vec<String> {
        compare_bills(bills, Classifier::builtin())
    }

    #[test]
    fn test_no_notes_for_modest_bills() {
        let bills = vec![bill("GitHub", "SaaS", 21.0), bill("Zoom", "SaaS", 15.0)];
        assert!(notes(&bills).is_empty());
        assert!(notes(&[]).is_empty());
    }

    #[test]
    fn test_high_api_costs() {
        let bills = vec![bill("OpenAI", "API", 150.0), bill("Anthropic", "API", 60.0)];
        let notes = notes(&bills);
        assert_eq!(notes.len(), 1);
        assert_eq!(
            notes[0],
            "⚠️ High API costs detected: $210.00. Consider usage optimization."
        );
    }

    #[test]
    fn test_api_total_at_threshold_is_quiet() {
        let bills = vec![bill("OpenAI", "API", 200.0)];
        assert!(notes(&bills).is_empty());
    }

    #[test]
    fn test_many_infrastructure_bills() {
        let bills = vec![
            bill("AWS", "Infra", 10.0),
            bill("Vercel", "Hosting", 20.0),
            bill("Cloudflare", "CDN", 5.0),
            bill("Namecheap", "Domain", 12.0),
        ];
        let notes = notes(&bills);
        assert_eq!(
            notes,
            vec!["📊 Multiple infrastructure bills (4). Review for consolidation opportunities."
                .to_string()]
        );
    }

    #[test]
    fn test_food_compared_to_critical() {
        // 60 food vs 100 critical: 60 > 20
        let bills = vec![bill("AWS", "Infra", 40.0), bill("Team Lunch", "Food", 60.0)];
        let notes = notes(&bills);
        assert_eq!(notes.len(), 1);
        assert!(notes[0].starts_with("🍽️ Team expenses ($60.00)"));
    }

    #[test]
    fn test_food_small_next_to_critical() {
        // 60 food vs 400 critical: 60 < 80
        let bills = vec![bill("AWS", "Infra", 400.0), bill("Team Lunch", "Food", 60.0)];
        assert!(notes(&bills).is_empty());
    }

    #[test]
    fn test_enterprise_spend() {
        let bills = vec![
            bill("Slack", "Enterprise plan", 300.0),
            bill("Notion", "Business plan", 250.0),
        ];
        let notes = notes(&bills);
        assert_eq!(
            notes,
            vec!["💼 Enterprise plans detected. Confirm these are essential for operations before approval."
                .to_string()]
        );
    }

    #[test]
    fn test_notes_in_check_order() {
        let bills = vec![
            bill("Offsite party", "Food", 700.0),
            bill("OpenAI", "API", 250.0),
            bill("AWS", "Infra", 10.0),
            bill("GCP", "Compute", 10.0),
            bill("Vercel", "Hosting", 10.0),
            bill("Supabase", "Database", 10.0),
        ];
        let notes = notes(&bills);
        assert_eq!(notes.len(), 4);
        assert!(notes[0].starts_with("⚠️"));
        assert!(notes[1].starts_with("📊"));
        assert!(notes[2].starts_with("🍽️"));
        assert!(notes[3].starts_with("💼"));
    }
}
