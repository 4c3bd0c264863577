//! Human-readable summary of an allocation run

use crate::models::{Bill, InvoiceType, PlanTier};

/// Closing line of every explanation
pub const PENDING_ONLY_NOTE: &str = "Only bills in pending status were considered.";

/// A bill as it appears in an explanation section
pub struct ExplainedBill<'a> {
    pub bill: &'a Bill,
    pub invoice_type: InvoiceType,
    pub plan_tier: PlanTier,
}

/// Build the explanation text for one run
///
/// Sections with no bills are left out entirely.
pub fn build_explanation(
    budget: f64,
    total_selected: f64,
    remaining: f64,
    paid: &[ExplainedBill<'_>],
    review: &[ExplainedBill<'_>],
    deferred: &[ExplainedBill<'_>],
) -> String {
    let mut lines = vec![format!(
        "Agent had a budget of ${:.2} and allocated ${:.2} to payments, leaving ${:.2} unspent.",
        budget, total_selected, remaining
    )];

    if !paid.is_empty() {
        lines.push(format!("\n✅ APPROVED ({} bills):", paid.len()));
        for (invoice_type, bills) in group_by_type(paid) {
            let subtotal: f64 = bills.iter().map(|b| b.amount).sum();
            let listed: Vec<String> = bills
                .iter()
                .map(|b| format!("{} (${})", b.vendor, b.amount))
                .collect();
            lines.push(format!(
                "  {}: ${:.2} - {}",
                invoice_type.as_str().to_uppercase(),
                subtotal,
                listed.join(", ")
            ));
        }
    }

    if !review.is_empty() {
        lines.push(format!("\n⚠️ REQUIRES REVIEW ({} bills):", review.len()));
        for item in review {
            lines.push(format!(
                "  {}: ${:.2} ({}, {} plan) - Confirm before payment",
                item.bill.vendor, item.bill.amount, item.invoice_type, item.plan_tier
            ));
        }
    }

    if !deferred.is_empty() {
        lines.push(format!("\n⏸️ DEFERRED ({} bills):", deferred.len()));
        for item in deferred {
            lines.push(format!(
                "  {}: ${:.2} ({}) - Lower priority or budget exceeded",
                item.bill.vendor, item.bill.amount, item.invoice_type
            ));
        }
    }

    lines.push(format!("\n{}", PENDING_ONLY_NOTE));
    lines.join("\n")
}

/// Group bills by invoice type, groups ordered by first appearance
fn group_by_type<'a>(items: &[ExplainedBill<'a>]) -> Vec<(InvoiceType, Vec<&'a Bill>)> {
    let mut groups: Vec<(InvoiceType, Vec<&'a Bill>)> = vec![];
    for item in items {
        match groups.iter_mut().find(|(t, _)| *t == item.invoice_type) {
            Some((_, bills)) => bills.push(item.bill),
            None => groups.push((item.invoice_type, vec![item.bill])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BillStatus;

    fn bill(vendor: &str, amount: f64) -> Bill {
        Bill {
            id: vendor.to_string(),
            vendor: vendor.to_string(),
            amount,
            due_date: None,
            status: BillStatus::Pending,
            category: None,
        }
    }

    fn item(bill: &Bill, invoice_type: InvoiceType, plan_tier: PlanTier) -> ExplainedBill<'_> {
        ExplainedBill {
            bill,
            invoice_type,
            plan_tier,
        }
    }

    #[test]
    fn test_summary_only() {
        let text = build_explanation(100.0, 0.0, 100.0, &[], &[], &[]);
        assert_eq!(
            text,
            "Agent had a budget of $100.00 and allocated $0.00 to payments, leaving $100.00 unspent.\n\nOnly bills in pending status were considered."
        );
    }

    #[test]
    fn test_full_explanation() {
        let aws = bill("AWS", 120.0);
        let openai = bill("OpenAI", 100.0);
        let vercel = bill("Vercel", 20.5);
        let slack = bill("Slack", 300.0);
        let lunch = bill("Team Lunch", 90.0);

        let paid = [
            item(&aws, InvoiceType::Infrastructure, PlanTier::Pro),
            item(&openai, InvoiceType::Api, PlanTier::Pro),
            item(&vercel, InvoiceType::Infrastructure, PlanTier::Unknown),
        ];
        let review = [item(&slack, InvoiceType::Saas, PlanTier::Enterprise)];
        let deferred = [item(&lunch, InvoiceType::Food, PlanTier::Pro)];

        let text = build_explanation(300.0, 240.5, 59.5, &paid, &review, &deferred);
        let expected = "\
Agent had a budget of $300.00 and allocated $240.50 to payments, leaving $59.50 unspent.

✅ APPROVED (3 bills):
  INFRASTRUCTURE: $140.50 - AWS ($120), Vercel ($20.5)
  API: $100.00 - OpenAI ($100)

⚠️ REQUIRES REVIEW (1 bills):
  Slack: $300.00 (saas, enterprise plan) - Confirm before payment

⏸️ DEFERRED (1 bills):
  Team Lunch: $90.00 (food) - Lower priority or budget exceeded

Only bills in pending status were considered.";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_empty_sections_omitted() {
        let lunch = bill("Team Lunch", 90.0);
        let deferred = [item(&lunch, InvoiceType::Food, PlanTier::Pro)];
        let text = build_explanation(0.0, 0.0, 0.0, &[], &[], &deferred);
        assert!(!text.contains("APPROVED"));
        assert!(!text.contains("REVIEW"));
        assert!(text.contains("⏸️ DEFERRED (1 bills):"));
    }
}
