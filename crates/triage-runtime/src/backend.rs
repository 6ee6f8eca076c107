//! Stateful complaint backend.
//!
//! [`ComplaintBackend`] owns the rule table, the loader options and a single
//! snapshot of loaded and categorized records. Each successful
//! [`ComplaintBackend::load`] replaces the snapshot wholesale; a failed load
//! leaves the previous snapshot in place. Every query reads the current
//! snapshot and fails with [`TriageError::NotLoaded`] when there is none.

use std::time::{Duration, Instant};

use triage_core::error::{Result, TriageError};
use triage_core::models::{
    CategorizedRecord, CategoryAggregate, CategoryCount, ChartSeries, ComplaintRecord, GoalCount,
    GoalMapping, SummaryStats,
};
use triage_core::rules::RuleSet;
use triage_data::aggregator::ComplaintAggregator;
use triage_data::analysis::DashboardReport;
use triage_data::categorizer::Categorizer;
use triage_data::loader::{load_sources, LoadOutcome, LoaderOptions, Source};

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// One loaded dataset. Never mutated after construction.
#[derive(Debug)]
struct Snapshot {
    outcome: LoadOutcome,
    categorized: Vec<CategorizedRecord>,
    loaded_at: Instant,
}

// ── ComplaintBackend ──────────────────────────────────────────────────────────

/// Load-once, query-many facade over the triage pipeline.
///
/// # Example
/// ```no_run
/// use triage_core::rules::RuleSet;
/// use triage_data::loader::{LoaderOptions, Source};
/// use triage_runtime::backend::ComplaintBackend;
///
/// let mut backend = ComplaintBackend::new(RuleSet::builtin(), LoaderOptions::default());
/// backend.load(vec![Source::path("complaints.csv")]).unwrap();
/// for row in backend.get_priority_ranking().unwrap() {
///     println!("{} {} {}", row.priority_rank, row.category, row.count);
/// }
/// ```
#[derive(Debug)]
pub struct ComplaintBackend {
    rules: RuleSet,
    options: LoaderOptions,
    snapshot: Option<Snapshot>,
    /// Description of the most recent failed load, cleared on success.
    last_error: Option<String>,
}

impl ComplaintBackend {
    pub fn new(rules: RuleSet, options: LoaderOptions) -> Self {
        Self {
            rules,
            options,
            snapshot: None,
            last_error: None,
        }
    }

    /// Build a backend and load `sources` in one step.
    pub fn from_sources(
        rules: RuleSet,
        options: LoaderOptions,
        sources: impl IntoIterator<Item = Source>,
    ) -> Result<Self> {
        let mut backend = Self::new(rules, options);
        backend.load(sources)?;
        Ok(backend)
    }

    // ── Loading ───────────────────────────────────────────────────────────

    /// Load and categorize `sources`, replacing the current snapshot.
    ///
    /// Returns the number of records in the new snapshot. On error the
    /// previous snapshot is kept.
    pub fn load(&mut self, sources: impl IntoIterator<Item = Source>) -> Result<usize> {
        let outcome = match load_sources(sources, &self.options) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "load failed; keeping previous snapshot");
                self.last_error = Some(e.to_string());
                return Err(e.into());
            }
        };

        let categorized = Categorizer::new(&self.rules).categorize_all(&outcome.records);
        let count = categorized.len();
        tracing::debug!(
            records = count,
            sources = outcome.sources.len(),
            failed = outcome.failures.len(),
            "snapshot replaced"
        );

        self.snapshot = Some(Snapshot {
            outcome,
            categorized,
            loaded_at: Instant::now(),
        });
        self.last_error = None;
        Ok(count)
    }

    /// Drop the current snapshot.
    pub fn clear(&mut self) {
        self.snapshot = None;
        tracing::debug!("snapshot cleared");
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Age of the current snapshot, or `None` if nothing is loaded.
    pub fn snapshot_age(&self) -> Option<Duration> {
        self.snapshot.as_ref().map(|s| s.loaded_at.elapsed())
    }

    /// Human-readable description of the last failed load, or `None`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Categorized records of the current snapshot, in load order.
    pub fn categorize(&self) -> Result<&[CategorizedRecord]> {
        Ok(&self.snapshot()?.categorized)
    }

    /// Records as loaded, before categorization.
    pub fn raw_records(&self) -> Result<&[ComplaintRecord]> {
        Ok(&self.snapshot()?.outcome.records)
    }

    /// Per-source summaries and skipped sources of the last successful load.
    pub fn last_outcome(&self) -> Result<&LoadOutcome> {
        Ok(&self.snapshot()?.outcome)
    }

    pub fn get_chart_data(&self) -> Result<ChartSeries> {
        let records = self.categorize()?;
        Ok(ComplaintAggregator::chart_series(records, &self.rules))
    }

    pub fn get_category_counts(&self) -> Result<Vec<CategoryCount>> {
        let records = self.categorize()?;
        Ok(ComplaintAggregator::category_counts(records, &self.rules))
    }

    pub fn get_priority_ranking(&self) -> Result<Vec<CategoryAggregate>> {
        let records = self.categorize()?;
        Ok(ComplaintAggregator::priority_ranking(records, &self.rules))
    }

    pub fn get_summary_stats(&self) -> Result<SummaryStats> {
        let records = self.categorize()?;
        Ok(ComplaintAggregator::summary_stats(records, &self.rules))
    }

    pub fn get_business_goal_mapping(&self) -> Result<Vec<GoalMapping>> {
        let records = self.categorize()?;
        Ok(ComplaintAggregator::goal_mapping(records, &self.rules))
    }

    pub fn get_business_goal_counts(&self) -> Result<Vec<GoalCount>> {
        let records = self.categorize()?;
        Ok(ComplaintAggregator::business_goal_counts(records, &self.rules))
    }

    /// Records assigned to `name`, in load order.
    ///
    /// `name` must be a configured category or `"Uncategorized"`.
    pub fn filter_by_category(&self, name: &str) -> Result<Vec<&CategorizedRecord>> {
        let records = self.categorize()?;
        if !self.rules.knows_category(name) {
            return Err(TriageError::UnknownCategory {
                name: name.to_string(),
            });
        }
        Ok(ComplaintAggregator::records_in_category(records, name))
    }

    /// Records whose category maps to `goal`, in load order.
    ///
    /// `goal` must be a configured goal or the empty uncategorized goal.
    pub fn filter_by_business_goal(&self, goal: &str) -> Result<Vec<&CategorizedRecord>> {
        let records = self.categorize()?;
        if !self.rules.knows_goal(goal) {
            return Err(TriageError::UnknownBusinessGoal {
                goal: goal.to_string(),
            });
        }
        Ok(ComplaintAggregator::records_for_goal(records, goal))
    }

    /// All views bundled into one serializable report.
    pub fn report(&self) -> Result<DashboardReport> {
        let snapshot = self.snapshot()?;
        Ok(DashboardReport::build(
            &snapshot.categorized,
            &self.rules,
            &snapshot.outcome,
        ))
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn snapshot(&self) -> Result<&Snapshot> {
        self.snapshot.as_ref().ok_or(TriageError::NotLoaded)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use triage_core::error::LoadError;
    use triage_core::models::UNCATEGORIZED;
    use triage_core::rules::CategoryRule;
    use triage_data::loader::LoadPolicy;

    const SCENARIO_A: &str =
        "Complaint\nMy bill was wrong\nunrelated text\ndouble charge applied\n";

    fn billing_rules() -> RuleSet {
        RuleSet::new(
            "test",
            vec![CategoryRule::new("Billing", &["bill", "charge"], "Improve Billing")],
        )
        .unwrap()
    }

    fn scenario_a() -> ComplaintBackend {
        ComplaintBackend::from_sources(
            billing_rules(),
            LoaderOptions::default(),
            vec![Source::memory("a.csv", SCENARIO_A)],
        )
        .unwrap()
    }

    // ── NotLoaded ─────────────────────────────────────────────────────────

    #[test]
    fn test_queries_before_load_fail() {
        let backend = ComplaintBackend::new(billing_rules(), LoaderOptions::default());
        assert!(!backend.is_loaded());
        assert!(matches!(backend.categorize(), Err(TriageError::NotLoaded)));
        assert!(matches!(backend.raw_records(), Err(TriageError::NotLoaded)));
        assert!(matches!(backend.last_outcome(), Err(TriageError::NotLoaded)));
        assert!(matches!(backend.get_chart_data(), Err(TriageError::NotLoaded)));
        assert!(matches!(backend.get_category_counts(), Err(TriageError::NotLoaded)));
        assert!(matches!(backend.get_priority_ranking(), Err(TriageError::NotLoaded)));
        assert!(matches!(backend.get_summary_stats(), Err(TriageError::NotLoaded)));
        assert!(matches!(
            backend.get_business_goal_mapping(),
            Err(TriageError::NotLoaded)
        ));
        assert!(matches!(
            backend.get_business_goal_counts(),
            Err(TriageError::NotLoaded)
        ));
        assert!(matches!(
            backend.filter_by_category("Billing"),
            Err(TriageError::NotLoaded)
        ));
        assert!(matches!(
            backend.filter_by_business_goal("Improve Billing"),
            Err(TriageError::NotLoaded)
        ));
        assert!(matches!(backend.report(), Err(TriageError::NotLoaded)));
        assert!(backend.snapshot_age().is_none());
    }

    // ── load / categorize ─────────────────────────────────────────────────

    #[test]
    fn test_scenario_a_counts() {
        let backend = scenario_a();
        let categories: Vec<&str> = backend
            .categorize()
            .unwrap()
            .iter()
            .map(|r| r.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Billing", UNCATEGORIZED, "Billing"]);

        let counts = backend.get_category_counts().unwrap();
        assert_eq!(counts[0].category, "Billing");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].category, UNCATEGORIZED);
        assert_eq!(counts[1].count, 1);
    }

    #[test]
    fn test_two_sources_keep_source_then_row_order() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        std::fs::write(&first, "Complaint Text\nbill one\nbill two\nbill three\n").unwrap();
        std::fs::write(&second, "complaint_text\nother one\nother two\n").unwrap();

        let mut backend = ComplaintBackend::new(billing_rules(), LoaderOptions::default());
        let loaded = backend
            .load(vec![Source::path(&first), Source::path(&second)])
            .unwrap();
        assert_eq!(loaded, 5);

        let raw = backend.raw_records().unwrap();
        let texts: Vec<&str> = raw.iter().map(|r| r.raw_text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["bill one", "bill two", "bill three", "other one", "other two"]
        );
        assert_eq!(raw[3].source, second.display().to_string());
        assert_eq!(raw[3].source_row_index, 0);
    }

    #[test]
    fn test_filter_by_category_scenario_c() {
        let backend = scenario_a();
        let billing = backend.filter_by_category("Billing").unwrap();
        let texts: Vec<&str> = billing.iter().map(|r| r.record.raw_text.as_str()).collect();
        assert_eq!(texts, vec!["My bill was wrong", "double charge applied"]);

        let other = backend.filter_by_category(UNCATEGORIZED).unwrap();
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_filter_by_unknown_category() {
        let backend = scenario_a();
        let err = backend.filter_by_category("Shipping").unwrap_err();
        assert!(matches!(err, TriageError::UnknownCategory { name } if name == "Shipping"));
    }

    #[test]
    fn test_filter_by_business_goal() {
        let backend = scenario_a();
        assert_eq!(backend.filter_by_business_goal("Improve Billing").unwrap().len(), 2);
        assert_eq!(backend.filter_by_business_goal("").unwrap().len(), 1);
        let err = backend.filter_by_business_goal("Grow Revenue").unwrap_err();
        assert!(matches!(err, TriageError::UnknownBusinessGoal { .. }));
    }

    #[test]
    fn test_known_category_with_no_records_filters_empty() {
        let rules = RuleSet::new(
            "test",
            vec![
                CategoryRule::new("Billing", &["bill"], "Improve Billing"),
                CategoryRule::new("Network", &["signal"], "Fix Network"),
            ],
        )
        .unwrap();
        let backend = ComplaintBackend::from_sources(
            rules,
            LoaderOptions::default(),
            vec![Source::memory("a.csv", SCENARIO_A)],
        )
        .unwrap();
        assert!(backend.filter_by_category("Network").unwrap().is_empty());
    }

    // ── Views ─────────────────────────────────────────────────────────────

    #[test]
    fn test_views_agree() {
        let backend = scenario_a();
        let chart = backend.get_chart_data().unwrap();
        let ranking = backend.get_priority_ranking().unwrap();
        let stats = backend.get_summary_stats().unwrap();

        assert_eq!(chart.categories.len(), ranking.len());
        for (i, row) in ranking.iter().enumerate() {
            assert_eq!(row.priority_rank, i + 1);
            assert_eq!(chart.categories[i], row.category);
            assert_eq!(chart.counts[i], row.count);
        }
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.distinct_categories, 2);
    }

    #[test]
    fn test_goal_views() {
        let backend = scenario_a();
        let mapping = backend.get_business_goal_mapping().unwrap();
        assert_eq!(mapping[0].category, "Billing");
        assert_eq!(mapping[0].count, 2);
        assert_eq!(mapping[1].category, UNCATEGORIZED);

        let goals = backend.get_business_goal_counts().unwrap();
        assert_eq!(goals[0].business_goal, "Improve Billing");
        assert_eq!(goals[0].count, 2);
    }

    #[test]
    fn test_report_bundles_views() {
        let backend = scenario_a();
        let report = backend.report().unwrap();
        assert_eq!(report.summary, backend.get_summary_stats().unwrap());
        assert_eq!(report.ranking, backend.get_priority_ranking().unwrap());
        assert_eq!(report.sources.len(), 1);
        assert!(report.failures.is_empty());
    }

    // ── Snapshot replacement ──────────────────────────────────────────────

    #[test]
    fn test_failed_load_keeps_previous_snapshot() {
        let mut backend = scenario_a();
        let err = backend
            .load(vec![Source::path("/nonexistent/complaints.csv")])
            .unwrap_err();
        assert!(matches!(
            err,
            TriageError::Load(LoadError::SourceNotFound { .. })
        ));
        assert!(backend.last_error().is_some());
        assert_eq!(backend.categorize().unwrap().len(), 3);
    }

    #[test]
    fn test_successful_reload_replaces_snapshot() {
        let mut backend = scenario_a();
        backend
            .load(vec![Source::memory("b.csv", "Complaint\nbill again\n")])
            .unwrap();
        assert_eq!(backend.categorize().unwrap().len(), 1);
        assert!(backend.last_error().is_none());
        assert_eq!(backend.raw_records().unwrap()[0].source, "b.csv");
    }

    #[test]
    fn test_partial_load_outcome_exposed() {
        let mut backend = ComplaintBackend::new(billing_rules(), LoaderOptions::default());
        backend
            .load(vec![
                Source::memory("good.csv", SCENARIO_A),
                Source::path("/nonexistent/bad.csv"),
            ])
            .unwrap();
        let outcome = backend.last_outcome().unwrap();
        assert!(outcome.is_partial());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(backend.report().unwrap().failures.len(), 1);
    }

    #[test]
    fn test_fail_fast_aborts() {
        let options = LoaderOptions {
            policy: LoadPolicy::FailFast,
            ..LoaderOptions::default()
        };
        let mut backend = ComplaintBackend::new(billing_rules(), options);
        let err = backend
            .load(vec![
                Source::path("/nonexistent/bad.csv"),
                Source::memory("good.csv", SCENARIO_A),
            ])
            .unwrap_err();
        assert!(matches!(err, TriageError::Load(_)));
        assert!(!backend.is_loaded());
    }

    #[test]
    fn test_clear_drops_snapshot() {
        let mut backend = scenario_a();
        assert!(backend.snapshot_age().is_some());
        backend.clear();
        assert!(matches!(backend.categorize(), Err(TriageError::NotLoaded)));
    }
}
