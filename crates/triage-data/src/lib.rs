//! Data layer for complaint triage.
//!
//! Reads complaint CSV sources, assigns each record a category from the rule
//! table, aggregates the categorized records into dashboard views and runs
//! the one-shot analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod categorizer;
pub mod loader;

pub use triage_core as core;

pub use aggregator::ComplaintAggregator;
pub use analysis::{analyze_complaints, AnalysisMetadata, AnalysisResult, DashboardReport};
pub use categorizer::Categorizer;
pub use loader::{load_sources, LoadOutcome, LoadPolicy, LoaderOptions, Source, SourceSummary};
