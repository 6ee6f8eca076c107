//! Shared domain types for complaint triage.
//!
//! Holds the complaint data model, the category rule table, the error
//! taxonomy, CLI settings and display formatting helpers used by the data,
//! runtime and binary crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod rules;
pub mod settings;

pub use error::{LoadError, Result, RuleError, SourceFailure, TriageError};
pub use models::{
    CategorizedRecord, CategoryAggregate, CategoryCount, CategoryShare, ChartSeries,
    ComplaintRecord, GoalCount, GoalMapping, SummaryStats, UNCATEGORIZED, UNCATEGORIZED_GOAL,
};
pub use rules::{CategoryRule, RuleSet};
