use serde::{Deserialize, Serialize};

/// Category assigned to records that match no configured rule.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Business goal paired with [`UNCATEGORIZED`].
pub const UNCATEGORIZED_GOAL: &str = "";

/// A single complaint row produced by the loader.
///
/// Records are never mutated after loading; identity is the pair
/// (`source`, `source_row_index`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    /// Complaint text taken from the detected text column.
    pub raw_text: String,
    /// Display name of the source the row came from.
    pub source: String,
    /// 0-based data-row index inside the source (header row excluded).
    pub source_row_index: usize,
}

impl ComplaintRecord {
    pub fn new(raw_text: impl Into<String>, source: impl Into<String>, row: usize) -> Self {
        Self {
            raw_text: raw_text.into(),
            source: source.into(),
            source_row_index: row,
        }
    }
}

/// A complaint record together with the category it was assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedRecord {
    #[serde(flatten)]
    pub record: ComplaintRecord,
    /// A configured category name or [`UNCATEGORIZED`].
    pub category: String,
    /// Goal of the assigned category; empty for [`UNCATEGORIZED`].
    pub business_goal: String,
}

impl CategorizedRecord {
    /// `true` when no rule matched this record.
    pub fn is_uncategorized(&self) -> bool {
        self.category == UNCATEGORIZED
    }
}

/// Number of records in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// One row of the priority ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    /// 1-based, contiguous rank (1 = most complaints).
    pub priority_rank: usize,
    pub category: String,
    pub count: usize,
    pub business_goal: String,
}

/// Parallel sequences ready to feed a bar chart.
///
/// All three vectors have the same length and share one ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub categories: Vec<String>,
    pub counts: Vec<usize>,
    pub business_goals: Vec<String>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Count and share of the total for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    /// `count / total * 100`, unrounded. Zero when the dataset is empty.
    pub percentage: f64,
}

/// Dataset-wide totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_records: usize,
    pub distinct_categories: usize,
    /// Per-category shares, in category-count order.
    pub categories: Vec<CategoryShare>,
}

impl SummaryStats {
    /// Look up the share of a single category.
    pub fn share_of(&self, category: &str) -> Option<&CategoryShare> {
        self.categories.iter().find(|s| s.category == category)
    }
}

/// Category to business goal pairing with the current record count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalMapping {
    pub category: String,
    pub business_goal: String,
    pub count: usize,
}

/// Number of records attributed to one business goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalCount {
    pub business_goal: String,
    pub count: usize,
}
