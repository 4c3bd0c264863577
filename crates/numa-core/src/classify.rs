//! Keyword classification of bills into invoice types and plan tiers
//!
//! Each keyword group from [`EngineConfig`] is compiled into one regex
//! alternation and tested against `"<vendor> <category>"` in lowercase.
//! Keywords match as substrings, so `db` also matches inside `mongodb`.
//! Rules are evaluated top to bottom and the first match wins.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::config::{EngineConfig, TierThresholds};
use crate::error::{Error, Result};
use crate::models::{Bill, InvoiceType, PlanTier};

/// Compiled size allowed for one keyword group
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// One ordered entry of a classification table
#[derive(Debug, Clone)]
struct KeywordRule<T> {
    /// `None` when the keyword list is empty (never matches)
    pattern: Option<Regex>,
    value: T,
}

impl<T: Copy> KeywordRule<T> {
    fn compile(keywords: &[String], value: T) -> Result<Self> {
        Self::compile_with_limit(keywords, value, REGEX_SIZE_LIMIT)
    }

    fn compile_with_limit(keywords: &[String], value: T, size_limit: usize) -> Result<Self> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .map(|k| regex::escape(&k))
            .collect();

        let pattern = if alternatives.is_empty() {
            None
        } else {
            let pattern = RegexBuilder::new(&alternatives.join("|"))
                .size_limit(size_limit)
                .build()
                .map_err(|e| Error::Config(format!("keyword list does not compile: {}", e)))?;
            Some(pattern)
        };

        Ok(Self { pattern, value })
    }

    fn matches(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(text))
    }
}

/// Classifies bills by vendor and category text
#[derive(Debug, Clone)]
pub struct Classifier {
    invoice_rules: Vec<KeywordRule<InvoiceType>>,
    tier_rules: Vec<KeywordRule<PlanTier>>,
    tiers: TierThresholds,
}

impl Classifier {
    /// Compile the keyword tables of a configuration
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let k = &config.invoice_keywords;
        let invoice_rules = vec![
            KeywordRule::compile(&k.infrastructure, InvoiceType::Infrastructure)?,
            KeywordRule::compile(&k.api, InvoiceType::Api)?,
            KeywordRule::compile(&k.saas, InvoiceType::Saas)?,
            KeywordRule::compile(&k.workspace, InvoiceType::Workspace)?,
            KeywordRule::compile(&k.food, InvoiceType::Food)?,
        ];

        let t = &config.tier_keywords;
        let tier_rules = vec![
            KeywordRule::compile(&t.enterprise, PlanTier::Enterprise)?,
            KeywordRule::compile(&t.pro, PlanTier::Pro)?,
            KeywordRule::compile(&t.team, PlanTier::Team)?,
            KeywordRule::compile(&t.individual, PlanTier::Individual)?,
        ];

        Ok(Self {
            invoice_rules,
            tier_rules,
            tiers: config.tiers.clone(),
        })
    }

    /// Classifier built from the compiled-in keyword lists
    pub fn builtin() -> &'static Classifier {
        static BUILTIN: OnceLock<Classifier> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Classifier::new(&EngineConfig::default()).expect("built-in keywords compile")
        })
    }

    /// Invoice type of a bill; `Other` when no group matches
    pub fn classify_invoice_type(&self, bill: &Bill) -> InvoiceType {
        let text = search_text(bill);
        self.invoice_rules
            .iter()
            .find(|rule| rule.matches(&text))
            .map(|rule| rule.value)
            .unwrap_or(InvoiceType::Other)
    }

    /// Plan tier of a bill
    ///
    /// Enterprise and pro also trigger on amount alone, so a large bill is
    /// enterprise whatever its text says.
    pub fn detect_plan_tier(&self, bill: &Bill) -> PlanTier {
        let text = search_text(bill);
        let amount = bill.amount;

        for rule in &self.tier_rules {
            let by_amount = match rule.value {
                PlanTier::Enterprise => amount > self.tiers.enterprise_above,
                PlanTier::Pro => {
                    amount > self.tiers.pro_above && amount <= self.tiers.enterprise_above
                }
                _ => false,
            };
            if by_amount || rule.matches(&text) {
                return rule.value;
            }
        }

        PlanTier::Unknown
    }
}

/// Lowercased `"<vendor> <category>"`
fn search_text(bill: &Bill) -> String {
    format!(
        "{} {}",
        bill.vendor.to_lowercase(),
        bill.category.as_deref().unwrap_or("").to_lowercase()
    )
}

/// Classify with the built-in keyword lists
pub fn classify_invoice_type(bill: &Bill) -> InvoiceType {
    Classifier::builtin().classify_invoice_type(bill)
}

/// Detect plan tier with the built-in keyword lists and thresholds
pub fn detect_plan_tier(bill: &Bill) -> PlanTier {
    Classifier::builtin().detect_plan_tier(bill)
}
