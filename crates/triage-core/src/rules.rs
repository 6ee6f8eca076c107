//! Category rule table used by the keyword categorizer.
//!
//! A [`RuleSet`] is the ordered list of [`CategoryRule`]s loaded once at
//! process start. Order matters: the first rule whose keywords match a
//! complaint decides its category.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::models::{UNCATEGORIZED, UNCATEGORIZED_GOAL};

/// Version label of the built-in rule table.
pub const BUILTIN_RULES_VERSION: &str = "builtin-1";

/// One category with its keyword list and business goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    #[serde(alias = "category")]
    pub category_name: String,
    /// Lower-cased, trimmed, de-duplicated keywords in configured order.
    pub keywords: Vec<String>,
    pub business_goal: String,
}

impl CategoryRule {
    pub fn new(category_name: &str, keywords: &[&str], business_goal: &str) -> Self {
        Self {
            category_name: category_name.to_string(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            business_goal: business_goal.to_string(),
        }
    }

    /// First keyword contained in `lowered`, which must already be lower-case.
    pub fn matching_keyword(&self, lowered: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|k| lowered.contains(k.as_str()))
            .map(String::as_str)
    }

    fn normalize(mut self) -> Self {
        let mut seen = HashSet::new();
        self.category_name = self.category_name.trim().to_string();
        self.business_goal = self.business_goal.trim().to_string();
        self.keywords = self
            .keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .collect();
        self
    }
}

/// On-disk shape of a rules file.
#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    version: Option<String>,
    rules: Vec<CategoryRule>,
}

/// Validated, ordered category rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    version: String,
    rules: Vec<CategoryRule>,
}

impl RuleSet {
    /// Normalize and validate `rules`.
    ///
    /// Keywords are trimmed, lower-cased and de-duplicated. Fails when the
    /// table is empty, a category name is blank, duplicated or equal to
    /// [`UNCATEGORIZED`], or a rule is left without keywords.
    pub fn new(version: impl Into<String>, rules: Vec<CategoryRule>) -> Result<Self, RuleError> {
        if rules.is_empty() {
            return Err(RuleError::Empty);
        }

        let mut names = HashSet::new();
        let mut normalized = Vec::with_capacity(rules.len());
        for (idx, rule) in rules.into_iter().enumerate() {
            let rule = rule.normalize();
            if rule.category_name.is_empty() {
                return Err(RuleError::EmptyCategoryName(idx));
            }
            if rule.category_name.eq_ignore_ascii_case(UNCATEGORIZED) {
                return Err(RuleError::ReservedCategory(rule.category_name));
            }
            if !names.insert(rule.category_name.clone()) {
                return Err(RuleError::DuplicateCategory(rule.category_name));
            }
            if rule.keywords.is_empty() {
                return Err(RuleError::NoKeywords {
                    category: rule.category_name,
                });
            }
            normalized.push(rule);
        }

        Ok(Self {
            version: version.into(),
            rules: normalized,
        })
    }

    /// The built-in telecom complaint table.
    pub fn builtin() -> Self {
        Self {
            version: BUILTIN_RULES_VERSION.to_string(),
            rules: builtin_rules().into_iter().map(CategoryRule::normalize).collect(),
        }
    }

    /// Parse a JSON rules document.
    ///
    /// `path` is only used to label errors.
    pub fn from_json_str(json: &str, path: &Path) -> Result<Self, RuleError> {
        let file: RuleFile = serde_json::from_str(json).map_err(|source| RuleError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let version = file
            .version
            .unwrap_or_else(|| path.display().to_string());
        Self::new(version, file.rules)
    }

    /// Read and parse a JSON rules file.
    pub fn from_file(path: &Path) -> Result<Self, RuleError> {
        let content = std::fs::read_to_string(path).map_err(|source| RuleError::File {
            path: path.to_path_buf(),
            source,
        })?;
        let set = Self::from_json_str(&content, path)?;
        tracing::debug!(
            path = %path.display(),
            version = %set.version,
            rules = set.len(),
            "loaded rule table"
        );
        Ok(set)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<&CategoryRule> {
        self.rules.iter().find(|r| r.category_name == category)
    }

    /// Tie-break position of a category.
    ///
    /// Configured categories map to their index; [`UNCATEGORIZED`] and any
    /// unknown name sort after every configured rule.
    pub fn position(&self, category: &str) -> usize {
        self.rules
            .iter()
            .position(|r| r.category_name == category)
            .unwrap_or(self.rules.len())
    }

    /// Business goal of a category; the empty goal for [`UNCATEGORIZED`].
    pub fn goal_for(&self, category: &str) -> Option<&str> {
        if category == UNCATEGORIZED {
            return Some(UNCATEGORIZED_GOAL);
        }
        self.get(category).map(|r| r.business_goal.as_str())
    }

    /// `true` for configured categories and for [`UNCATEGORIZED`].
    pub fn knows_category(&self, category: &str) -> bool {
        category == UNCATEGORIZED || self.get(category).is_some()
    }

    /// `true` for configured goals and for the uncategorized goal.
    pub fn knows_goal(&self, goal: &str) -> bool {
        goal == UNCATEGORIZED_GOAL || self.rules.iter().any(|r| r.business_goal == goal)
    }

    /// Distinct business goals in order of first appearance.
    pub fn goals(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rules
            .iter()
            .map(|r| r.business_goal.as_str())
            .filter(|g| seen.insert(*g))
            .collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

// ── Built-in table ────────────────────────────────────────────────────────────

fn builtin_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            "Security/Privacy",
            &[
                "security", "privacy", "hack", "hacked", "breach", "data breach", "leak",
                "leaked", "unauthorized access", "fraud", "fraudulent", "scam", "phishing",
                "identity theft", "personal information", "data exposed", "privacy violation",
                "security issue", "security problem", "compromised", "stolen", "theft",
                "unauthorized", "suspicious",
            ],
            "Strengthen Security and Privacy Measures",
        ),
        CategoryRule::new(
            "App/Online",
            &[
                "app", "application", "online", "website", "web", "login", "log in", "crash",
                "crashes", "bug", "bugs", "error", "not working", "broken", "freeze", "frozen",
                "slow", "loading", "interface", "ui", "user interface", "mobile app",
                "web portal", "online portal", "digital", "platform", "system", "software",
            ],
            "Improve Digital and Online Experience",
        ),
        CategoryRule::new(
            "Network/Service",
            &[
                "network", "signal", "outage", "call drop", "dropped call", "slow data",
                "no service", "service drop", "connection", "coverage", "speed",
                "internet speed", "data speed", "throttling", "disconnect", "disconnected",
                "unavailable", "down", "offline", "not working", "poor service",
                "service quality", "latency", "lag", "buffering",
            ],
            "Improve Network Quality and Reliability",
        ),
        CategoryRule::new(
            "Billing/Charges",
            &[
                "bill", "billing", "charge", "charged", "overcharge", "overcharged", "fee",
                "fees", "refund", "payment", "cost", "price", "pricing", "double charge",
                "unauthorized charge", "wrong charge", "incorrect bill", "billing error",
                "monthly bill", "invoice", "statement", "money",
            ],
            "Improve Billing Transparency and Accuracy",
        ),
        CategoryRule::new(
            "Customer Support",
            &[
                "support", "agent", "customer service", "service rep", "representative",
                "rude", "rudeness", "slow response", "response time", "wait time",
                "hold time", "escalate", "escalation", "unhelpful", "not helpful",
                "poor service", "service quality", "customer care", "help", "assistance",
                "unresolved", "not resolved", "no solution", "no help",
            ],
            "Enhance Customer Support Experience",
        ),
        CategoryRule::new(
            "Plan/Features",
            &[
                "plan", "feature", "features", "upgrade plan", "downgrade", "plan change",
                "service plan", "data plan", "usage cap", "data cap", "limit", "limits",
                "promo", "promotion", "promotional", "offer", "deal", "eligibility",
                "qualify", "new feature", "feature not working", "plan feature",
                "service feature", "subscription", "package",
            ],
            "Optimize Service Plans and Features",
        ),
        CategoryRule::new(
            "Device/Account",
            &[
                "device", "phone", "sim", "sim card", "account", "account locked",
                "locked account", "phone not received", "device not received",
                "upgrade device", "trade-in", "trade in", "activation", "activate",
                "device issue", "phone issue", "hardware", "equipment", "account access",
                "cannot access", "account problem", "device problem",
            ],
            "Streamline Device and Account Management",
        ),
    ]
}
