//! Category and business-goal aggregation over categorized records.
//!
//! Every view shares one ordering: descending record count, ties broken
//! by the position of the category in the rule set, with
//! [`UNCATEGORIZED`] after every configured category.

use std::cmp::Ordering;
use std::collections::HashMap;

use triage_core::formatting::percentage;
use triage_core::models::{
    CategorizedRecord, CategoryAggregate, CategoryCount, CategoryShare, ChartSeries, GoalCount,
    GoalMapping, SummaryStats, UNCATEGORIZED, UNCATEGORIZED_GOAL,
};
use triage_core::rules::RuleSet;

// ── Tally ─────────────────────────────────────────────────────────────────────

/// Records counted under one key, remembering the goal seen for it.
#[derive(Debug, Clone, Default)]
struct Tally<'a> {
    count: usize,
    business_goal: &'a str,
}

fn tally_categories(records: &[CategorizedRecord]) -> HashMap<&str, Tally<'_>> {
    let mut tallies: HashMap<&str, Tally<'_>> = HashMap::new();
    for record in records {
        let tally = tallies.entry(record.category.as_str()).or_default();
        tally.count += 1;
        tally.business_goal = record.business_goal.as_str();
    }
    tallies
}

/// Descending count, then rule position, then name.
fn by_count_then_rule(
    rules: &RuleSet,
    (a_name, a_count): (&str, usize),
    (b_name, b_count): (&str, usize),
) -> Ordering {
    b_count
        .cmp(&a_count)
        .then_with(|| rules.position(a_name).cmp(&rules.position(b_name)))
        .then_with(|| (a_name == UNCATEGORIZED).cmp(&(b_name == UNCATEGORIZED)))
        .then_with(|| a_name.cmp(b_name))
}

// ── ComplaintAggregator ───────────────────────────────────────────────────────

/// Stateless helper that turns categorized records into dashboard views.
pub struct ComplaintAggregator;

impl ComplaintAggregator {
    /// Number of records per category, for categories with at least one
    /// record.
    pub fn category_counts(records: &[CategorizedRecord], rules: &RuleSet) -> Vec<CategoryCount> {
        Self::ordered_tallies(records, rules)
            .into_iter()
            .map(|(category, tally)| CategoryCount {
                category: category.to_string(),
                count: tally.count,
            })
            .collect()
    }

    /// Parallel category / count / goal sequences in category-count order.
    pub fn chart_series(records: &[CategorizedRecord], rules: &RuleSet) -> ChartSeries {
        let mut series = ChartSeries::default();
        for (category, tally) in Self::ordered_tallies(records, rules) {
            series.categories.push(category.to_string());
            series.counts.push(tally.count);
            series.business_goals.push(tally.business_goal.to_string());
        }
        series
    }

    /// Totals and per-category shares of the dataset.
    pub fn summary_stats(records: &[CategorizedRecord], rules: &RuleSet) -> SummaryStats {
        let total = records.len();
        let categories: Vec<CategoryShare> = Self::ordered_tallies(records, rules)
            .into_iter()
            .map(|(category, tally)| CategoryShare {
                category: category.to_string(),
                count: tally.count,
                percentage: percentage(tally.count, total),
            })
            .collect();
        SummaryStats {
            total_records: total,
            distinct_categories: categories.len(),
            categories,
        }
    }

    /// Categories ranked 1..N by record count.
    pub fn priority_ranking(
        records: &[CategorizedRecord],
        rules: &RuleSet,
    ) -> Vec<CategoryAggregate> {
        Self::ordered_tallies(records, rules)
            .into_iter()
            .enumerate()
            .map(|(i, (category, tally))| CategoryAggregate {
                priority_rank: i + 1,
                category: category.to_string(),
                count: tally.count,
                business_goal: tally.business_goal.to_string(),
            })
            .collect()
    }

    /// Records per business goal.
    ///
    /// Ties fall back to the order goals first appear in the rule set; the
    /// empty goal of uncategorized records sorts last.
    pub fn business_goal_counts(records: &[CategorizedRecord], rules: &RuleSet) -> Vec<GoalCount> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in records {
            *counts.entry(record.business_goal.as_str()).or_default() += 1;
        }

        let goal_order = rules.goals();
        let position = |goal: &str| {
            goal_order
                .iter()
                .position(|g| *g == goal && goal != UNCATEGORIZED_GOAL)
                .unwrap_or(goal_order.len())
        };

        let mut ordered: Vec<(&str, usize)> = counts.into_iter().collect();
        ordered.sort_by(|(a_goal, a_count), (b_goal, b_count)| {
            b_count
                .cmp(a_count)
                .then_with(|| position(*a_goal).cmp(&position(*b_goal)))
                .then_with(|| a_goal.is_empty().cmp(&b_goal.is_empty()))
                .then_with(|| a_goal.cmp(b_goal))
        });

        ordered
            .into_iter()
            .map(|(goal, count)| GoalCount {
                business_goal: goal.to_string(),
                count,
            })
            .collect()
    }

    /// Every configured category with its goal and current count.
    ///
    /// Rows follow rule order and include zero-count categories. An
    /// [`UNCATEGORIZED`] row is appended only when such records exist.
    pub fn goal_mapping(records: &[CategorizedRecord], rules: &RuleSet) -> Vec<GoalMapping> {
        let tallies = tally_categories(records);
        let count_of = |category: &str| tallies.get(category).map_or(0, |t| t.count);

        let mut mapping: Vec<GoalMapping> = rules
            .rules()
            .iter()
            .map(|rule| GoalMapping {
                category: rule.category_name.clone(),
                business_goal: rule.business_goal.clone(),
                count: count_of(&rule.category_name),
            })
            .collect();

        let uncategorized = count_of(UNCATEGORIZED);
        if uncategorized > 0 {
            mapping.push(GoalMapping {
                category: UNCATEGORIZED.to_string(),
                business_goal: UNCATEGORIZED_GOAL.to_string(),
                count: uncategorized,
            });
        }
        mapping
    }

    /// Records assigned to `category`, in load order.
    pub fn records_in_category<'a>(
        records: &'a [CategorizedRecord],
        category: &str,
    ) -> Vec<&'a CategorizedRecord> {
        records.iter().filter(|r| r.category == category).collect()
    }

    /// Records whose category maps to `goal`, in load order.
    pub fn records_for_goal<'a>(
        records: &'a [CategorizedRecord],
        goal: &str,
    ) -> Vec<&'a CategorizedRecord> {
        records.iter().filter(|r| r.business_goal == goal).collect()
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn ordered_tallies<'a>(
        records: &'a [CategorizedRecord],
        rules: &RuleSet,
    ) -> Vec<(&'a str, Tally<'a>)> {
        let mut ordered: Vec<(&str, Tally<'_>)> = tally_categories(records).into_iter().collect();
        ordered.sort_by(|(a, a_tally), (b, b_tally)| {
            by_count_then_rule(rules, (*a, a_tally.count), (*b, b_tally.count))
        });
        ordered
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
