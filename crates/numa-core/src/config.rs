//! Engine configuration
//!
//! Review thresholds, tier amount thresholds and the keyword tables are data,
//! not code, so they can be tuned without a rebuild.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path (`--config`, or `NUMA_ENGINE_CONFIG`), else the override
//!    in the data dir (~/.local/share/numa/config/engine.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! A path named by the flag or the env var must exist; only the data-dir
//! override may be absent.
//!
//! Any key omitted from an override file keeps its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// Environment variable naming an engine config file
pub const CONFIG_PATH_ENV: &str = "NUMA_ENGINE_CONFIG";

/// When a bill is held for human review instead of being auto-allocated
///
/// The values are heuristics carried over from the dashboard; they have no
/// derivation beyond that, so they stay tunable.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewThresholds {
    /// Review when `amount > budget * budget_share`
    pub budget_share: f64,
    /// Review enterprise-tier bills with `amount > enterprise_amount`
    pub enterprise_amount: f64,
    /// Review food bills with `amount > food_amount`
    pub food_amount: f64,
    /// Review when `amount > (budget / pending_count) * fair_share_multiplier`
    pub fair_share_multiplier: f64,
}

impl Default for ReviewThresholds {
    fn default() -> Self {
        Self {
            budget_share: 0.5,
            enterprise_amount: 100.0,
            food_amount: 100.0,
            fair_share_multiplier: 2.0,
        }
    }
}

/// Amounts that force a plan tier on their own
#[derive(Debug, Clone, PartialEq)]
pub struct TierThresholds {
    /// `amount > enterprise_above` is enterprise
    pub enterprise_above: f64,
    /// `pro_above < amount <= enterprise_above` is pro
    pub pro_above: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            enterprise_above: 500.0,
            pro_above: 50.0,
        }
    }
}

/// Keyword groups for invoice-type detection
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceKeywords {
    pub infrastructure: Vec<String>,
    pub api: Vec<String>,
    pub saas: Vec<String>,
    pub workspace: Vec<String>,
    pub food: Vec<String>,
}

/// Keyword groups for plan-tier detection
#[derive(Debug, Clone, PartialEq)]
pub struct TierKeywords {
    pub enterprise: Vec<String>,
    pub pro: Vec<String>,
    pub team: Vec<String>,
    pub individual: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for InvoiceKeywords {
    fn default() -> Self {
        Self {
            infrastructure: words(&[
                "aws",
                "azure",
                "gcp",
                "cloud",
                "vercel",
                "hosting",
                "infrastructure",
                "infra",
                "database",
                "db",
                "server",
                "compute",
                "storage",
                "cdn",
                "domain",
                "ssl",
            ]),
            api: words(&[
                "api",
                "openai",
                "anthropic",
                "claude",
                "gpt",
                "azure openai",
                "api key",
                "api usage",
                "tokens",
                "model",
                "llm",
                "ai service",
            ]),
            saas: words(&[
                "github",
                "gitlab",
                "linear",
                "jira",
                "figma",
                "slack",
                "notion",
                "confluence",
                "asana",
                "trello",
                "zoom",
                "productivity",
                "saas",
                "tool",
            ]),
            workspace: words(&[
                "wework",
                "office",
                "workspace",
                "desk",
                "rent",
                "office space",
                "co-working",
            ]),
            food: words(&[
                "lunch",
                "food",
                "restaurant",
                "catering",
                "dinner",
                "swag",
                "merch",
                "party",
                "offsite",
                "team building",
                "social",
            ]),
        }
    }
}

impl Default for TierKeywords {
    fn default() -> Self {
        Self {
            enterprise: words(&["enterprise", "business", "enterprise plan", "business plan"]),
            pro: words(&["pro", "professional", "team seats", "team plan", "pro plan"]),
            team: words(&["team", "team seats"]),
            individual: words(&["individual", "starter", "basic", "free"]),
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineConfig {
    pub review: ReviewThresholds,
    pub tiers: TierThresholds,
    pub invoice_keywords: InvoiceKeywords,
    pub tier_keywords: TierKeywords,
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Embedded,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded defaults"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl EngineConfig {
    /// Resolve and load configuration (see module docs for the order)
    pub fn load(explicit_path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let env_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        Self::resolve(explicit_path.map(Path::to_path_buf), env_path)
    }

    /// A path the user named (flag or env var) must exist; the data-dir
    /// override is optional
    fn resolve(
        explicit_path: Option<PathBuf>,
        env_path: Option<PathBuf>,
    ) -> Result<(Self, ConfigSource)> {
        match explicit_path.or(env_path) {
            Some(path) if path.exists() => Self::load_file(path),
            Some(path) => Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            ))),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_file(path),
                _ => Ok((Self::embedded()?, ConfigSource::Embedded)),
            },
        }
    }

    fn load_file(path: PathBuf) -> Result<(Self, ConfigSource)> {
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_toml(&content)?;
        debug!(path = %path.display(), "Loaded engine config override");
        Ok((config, ConfigSource::File(path)))
    }

    /// The compiled-in defaults
    pub fn embedded() -> Result<Self> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Parse TOML, layering any present keys over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = EngineConfig::default();

        if let Some(review) = raw.review {
            if let Some(v) = review.budget_share {
                config.review.budget_share = v;
            }
            if let Some(v) = review.enterprise_amount {
                config.review.enterprise_amount = v;
            }
            if let Some(v) = review.food_amount {
                config.review.food_amount = v;
            }
            if let Some(v) = review.fair_share_multiplier {
                config.review.fair_share_multiplier = v;
            }
        }

        if let Some(tiers) = raw.tiers {
            if let Some(v) = tiers.enterprise_above {
                config.tiers.enterprise_above = v;
            }
            if let Some(v) = tiers.pro_above {
                config.tiers.pro_above = v;
            }
        }

        if let Some(keywords) = raw.keywords {
            if let Some(invoice) = keywords.invoice {
                let k = &mut config.invoice_keywords;
                replace_if_set(&mut k.infrastructure, invoice.infrastructure);
                replace_if_set(&mut k.api, invoice.api);
                replace_if_set(&mut k.saas, invoice.saas);
                replace_if_set(&mut k.workspace, invoice.workspace);
                replace_if_set(&mut k.food, invoice.food);
            }
            if let Some(tier) = keywords.tier {
                let k = &mut config.tier_keywords;
                replace_if_set(&mut k.enterprise, tier.enterprise);
                replace_if_set(&mut k.pro, tier.pro);
                replace_if_set(&mut k.team, tier.team);
                replace_if_set(&mut k.individual, tier.individual);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds that would make review decisions meaningless
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("review.budget_share", self.review.budget_share),
            ("review.enterprise_amount", self.review.enterprise_amount),
            ("review.food_amount", self.review.food_amount),
            ("review.fair_share_multiplier", self.review.fair_share_multiplier),
            ("tiers.enterprise_above", self.tiers.enterprise_above),
            ("tiers.pro_above", self.tiers.pro_above),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.tiers.pro_above > self.tiers.enterprise_above {
            return Err(Error::Config(format!(
                "tiers.pro_above ({}) exceeds tiers.enterprise_above ({})",
                self.tiers.pro_above, self.tiers.enterprise_above
            )));
        }
        Ok(())
    }
}

fn replace_if_set(target: &mut Vec<String>, value: Option<Vec<String>>) {
    if let Some(list) = value {
        *target = list;
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("numa").join("config").join("engine.toml"))
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    review: Option<RawReview>,
    tiers: Option<RawTiers>,
    keywords: Option<RawKeywords>,
}

#[derive(Debug, Deserialize)]
struct RawReview {
    budget_share: Option<f64>,
    enterprise_amount: Option<f64>,
    food_amount: Option<f64>,
    fair_share_multiplier: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawTiers {
    enterprise_above: Option<f64>,
    pro_above: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawKeywords {
    invoice: Option<RawInvoiceKeywords>,
    tier: Option<RawTierKeywords>,
}

#[derive(Debug, Deserialize)]
struct RawInvoiceKeywords {
    infrastructure: Option<Vec<String>>,
    api: Option<Vec<String>>,
    saas: Option<Vec<String>>,
    workspace: Option<Vec<String>>,
    food: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawTierKeywords {
    enterprise: Option<Vec<String>>,
    pro: Option<Vec<String>>,
    team: Option<Vec<String>>,
    individual: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_matches_defaults() {
        let embedded = EngineConfig::embedded().unwrap();
        assert_eq!(embedded, EngineConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            [review]
            budget_share = 0.75

            [keywords.invoice]
            food = ["pizza"]
            "#,
        )
        .unwrap();

        assert_eq!(config.review.budget_share, 0.75);
        assert_eq!(config.review.enterprise_amount, 100.0);
        assert_eq!(config.invoice_keywords.food, vec!["pizza".to_string()]);
        assert!(config.invoice_keywords.infrastructure.contains(&"aws".to_string()));
        assert_eq!(config.tier_keywords, TierKeywords::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = EngineConfig::from_toml("[review\nbudget_share = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let err = EngineConfig::from_toml("[review]\nfood_amount = -1.0").unwrap_err();
        assert!(err.to_string().contains("review.food_amount"));
    }

    #[test]
    fn test_inverted_tier_thresholds_rejected() {
        let err = EngineConfig::from_toml("[tiers]\npro_above = 900.0").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tiers]\nenterprise_above = 1000.0").unwrap();

        let (config, source) = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.tiers.enterprise_above, 1000.0);
        assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_load_missing_explicit_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = EngineConfig::load(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_missing_env_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("from-env.toml");
        let err = EngineConfig::resolve(None, Some(missing)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("from-env.toml"));
    }

    #[test]
    fn test_explicit_path_beats_env_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[review]\nbudget_share = 0.8").unwrap();
        let dir = tempfile::tempdir().unwrap();

        let (config, source) = EngineConfig::resolve(
            Some(file.path().to_path_buf()),
            Some(dir.path().join("ignored.toml")),
        )
        .unwrap();
        assert_eq!(config.review.budget_share, 0.8);
        assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("numa/config/engine.toml"));
        }
    }
}
