//! First-match keyword categorizer.
//!
//! Each complaint is lower-cased once and tested against the rules of a
//! [`RuleSet`] in order. The first rule with any keyword contained in the
//! text decides the category; text that matches nothing is
//! [`UNCATEGORIZED`].

use serde::Serialize;
use triage_core::models::{CategorizedRecord, ComplaintRecord, UNCATEGORIZED, UNCATEGORIZED_GOAL};
use triage_core::rules::RuleSet;

/// Category and goal chosen for one piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment<'a> {
    pub category: &'a str,
    pub business_goal: &'a str,
}

impl Assignment<'_> {
    pub fn is_uncategorized(&self) -> bool {
        self.category == UNCATEGORIZED
    }
}

/// A rule that matched, with the keyword that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleMatch<'a> {
    pub category: &'a str,
    pub business_goal: &'a str,
    pub keyword: &'a str,
}

/// Stateless categorizer borrowing a rule table.
#[derive(Debug, Clone, Copy)]
pub struct Categorizer<'a> {
    rules: &'a RuleSet,
}

impl<'a> Categorizer<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Assign a category to `text`.
    ///
    /// Empty or whitespace-only text is always uncategorized.
    pub fn categorize_text(&self, text: &str) -> Assignment<'a> {
        if text.trim().is_empty() {
            return Self::uncategorized();
        }
        let lowered = text.to_lowercase();
        self.rules
            .rules()
            .iter()
            .find(|rule| rule.matching_keyword(&lowered).is_some())
            .map(|rule| Assignment {
                category: rule.category_name.as_str(),
                business_goal: rule.business_goal.as_str(),
            })
            .unwrap_or_else(Self::uncategorized)
    }

    /// Categorize one record, copying it into a [`CategorizedRecord`].
    pub fn categorize(&self, record: &ComplaintRecord) -> CategorizedRecord {
        let assignment = self.categorize_text(&record.raw_text);
        CategorizedRecord {
            record: record.clone(),
            category: assignment.category.to_string(),
            business_goal: assignment.business_goal.to_string(),
        }
    }

    /// Categorize every record, preserving order.
    pub fn categorize_all(&self, records: &[ComplaintRecord]) -> Vec<CategorizedRecord> {
        let categorized: Vec<CategorizedRecord> =
            records.iter().map(|r| self.categorize(r)).collect();
        tracing::debug!(
            records = categorized.len(),
            uncategorized = categorized.iter().filter(|r| r.is_uncategorized()).count(),
            rules_version = %self.rules.version(),
            "categorized records"
        );
        categorized
    }

    /// Every rule that matches `text`, in rule order.
    ///
    /// The first entry is the rule [`categorize_text`](Self::categorize_text)
    /// assigns; the rest explain which other categories the text touched.
    pub fn matches(&self, text: &str) -> Vec<RuleMatch<'a>> {
        let lowered = text.to_lowercase();
        self.rules
            .rules()
            .iter()
            .filter_map(|rule| {
                rule.matching_keyword(&lowered).map(|keyword| RuleMatch {
                    category: rule.category_name.as_str(),
                    business_goal: rule.business_goal.as_str(),
                    keyword,
                })
            })
            .collect()
    }

    fn uncategorized() -> Assignment<'a> {
        Assignment {
            category: UNCATEGORIZED,
            business_goal: UNCATEGORIZED_GOAL,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::rules::CategoryRule;

    fn billing_rules() -> RuleSet {
        RuleSet::new(
            "test",
            vec![CategoryRule::new("Billing", &["bill", "charge"], "Improve Billing")],
        )
        .unwrap()
    }

    fn overlapping_rules() -> RuleSet {
        RuleSet::new(
            "test",
            vec![
                CategoryRule::new("Network", &["slow"], "Fix Network"),
                CategoryRule::new(
                    "App",
                    &["slow", "app", "crash", "login", "freeze"],
                    "Fix App",
                ),
            ],
        )
        .unwrap()
    }

    fn record(text: &str, row: usize) -> ComplaintRecord {
        ComplaintRecord::new(text, "mem", row)
    }

    // ── categorize_text ───────────────────────────────────────────────────

    #[test]
    fn test_single_rule_scenario() {
        let rules = billing_rules();
        let categorizer = Categorizer::new(&rules);
        let got: Vec<&str> = ["My bill was wrong", "unrelated text", "double charge applied"]
            .iter()
            .map(|t| categorizer.categorize_text(t).category)
            .collect();
        assert_eq!(got, vec!["Billing", UNCATEGORIZED, "Billing"]);
    }

    #[test]
    fn test_case_insensitive_substring_match() {
        let rules = billing_rules();
        let categorizer = Categorizer::new(&rules);
        let assignment = categorizer.categorize_text("OVERCHARGED AGAIN");
        assert_eq!(assignment.category, "Billing");
        assert_eq!(assignment.business_goal, "Improve Billing");
    }

    #[test]
    fn test_first_rule_wins_over_stronger_later_match() {
        let rules = overlapping_rules();
        let categorizer = Categorizer::new(&rules);
        // Matches one Network keyword and four App keywords.
        let assignment = categorizer.categorize_text("app is slow, crashes on login and freezes");
        assert_eq!(assignment.category, "Network");
    }

    #[test]
    fn test_empty_and_blank_text_is_uncategorized() {
        let rules = billing_rules();
        let categorizer = Categorizer::new(&rules);
        for text in ["", "   ", "\n\t"] {
            let assignment = categorizer.categorize_text(text);
            assert!(assignment.is_uncategorized());
            assert_eq!(assignment.business_goal, UNCATEGORIZED_GOAL);
        }
    }

    #[test]
    fn test_deterministic() {
        let rules = RuleSet::builtin();
        let categorizer = Categorizer::new(&rules);
        let text = "I was charged twice and the app keeps crashing";
        let first = categorizer.categorize_text(text);
        for _ in 0..10 {
            assert_eq!(categorizer.categorize_text(text), first);
        }
    }

    #[test]
    fn test_builtin_priority_security_before_billing() {
        let rules = RuleSet::builtin();
        let categorizer = Categorizer::new(&rules);
        let assignment = categorizer.categorize_text("Fraudulent charge on my bill");
        assert_eq!(assignment.category, "Security/Privacy");
    }

    #[test]
    fn test_builtin_billing() {
        let rules = RuleSet::builtin();
        let categorizer = Categorizer::new(&rules);
        assert_eq!(
            categorizer.categorize_text("My bill was wrong").category,
            "Billing/Charges"
        );
    }

    // ── categorize / categorize_all ───────────────────────────────────────

    #[test]
    fn test_categorize_all_preserves_order_and_identity() {
        let rules = billing_rules();
        let categorizer = Categorizer::new(&rules);
        let records = vec![
            record("My bill was wrong", 0),
            record("unrelated text", 1),
            record("double charge applied", 2),
        ];
        let categorized = categorizer.categorize_all(&records);

        assert_eq!(categorized.len(), 3);
        for (original, done) in records.iter().zip(&categorized) {
            assert_eq!(&done.record, original);
        }
        assert_eq!(categorized[1].category, UNCATEGORIZED);
        assert_eq!(categorized[2].business_goal, "Improve Billing");
    }

    #[test]
    fn test_categorize_all_total() {
        let rules = RuleSet::builtin();
        let categorizer = Categorizer::new(&rules);
        let records: Vec<ComplaintRecord> = [
            "no signal",
            "bill too high",
            "rude agent",
            "",
            "my sim card",
            "zzz",
        ]
        .iter()
        .enumerate()
        .map(|(i, t)| record(t, i))
        .collect();
        let categorized = categorizer.categorize_all(&records);
        let known = categorized.iter().filter(|r| !r.is_uncategorized()).count();
        let unknown = categorized.iter().filter(|r| r.is_uncategorized()).count();
        assert_eq!(known + unknown, records.len());
        assert!(categorized
            .iter()
            .all(|r| rules.knows_category(&r.category)));
    }

    // ── matches ───────────────────────────────────────────────────────────

    #[test]
    fn test_matches_lists_every_rule_in_order() {
        let rules = overlapping_rules();
        let categorizer = Categorizer::new(&rules);
        let matches = categorizer.matches("the app is slow");
        let categories: Vec<&str> = matches.iter().map(|m| m.category).collect();
        assert_eq!(categories, vec!["Network", "App"]);
        assert_eq!(matches[0].keyword, "slow");
        assert_eq!(matches[1].keyword, "slow");
        assert_eq!(
            matches[0].category,
            categorizer.categorize_text("the app is slow").category
        );
    }

    #[test]
    fn test_matches_empty_for_unmatched_text() {
        let rules = billing_rules();
        let categorizer = Categorizer::new(&rules);
        assert!(categorizer.matches("unrelated").is_empty());
    }
}
