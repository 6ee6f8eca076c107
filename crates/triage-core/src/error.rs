use std::path::PathBuf;
use thiserror::Error;

/// A source that failed to load, kept alongside the sources that succeeded.
#[derive(Debug)]
pub struct SourceFailure {
    /// Identifier of the failed source (file path or in-memory name).
    pub source_name: String,
    /// Why the source could not be loaded.
    pub error: LoadError,
}

/// Errors raised while turning tabular sources into complaint records.
#[derive(Error, Debug)]
pub enum LoadError {
    /// `load` was called with an empty source list.
    #[error("No sources given")]
    NoSources,

    /// A path source does not exist on disk.
    #[error("Source not found: {source_name}")]
    SourceNotFound { source_name: String },

    /// A source could not be opened or read.
    #[error("Failed to read source {source_name}: {io}")]
    Read {
        source_name: String,
        #[source]
        io: std::io::Error,
    },

    /// The CSV structure of a source could not be parsed.
    #[error("Failed to parse source {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// The source has no header row, so no text column can be chosen.
    #[error("No text column detected in {source_name}")]
    NoTextColumn { source_name: String },

    /// The source parsed but produced zero usable rows.
    #[error("Source {source_name} contains no usable rows")]
    EmptySource { source_name: String },

    /// Every source in a partial-success load failed.
    #[error("All {} sources failed to load: {}", .failures.len(), describe_failures(.failures))]
    AllSourcesFailed { failures: Vec<SourceFailure> },
}

impl LoadError {
    /// The identifier of the source this error refers to, if it names one.
    pub fn source_name(&self) -> Option<&str> {
        match self {
            LoadError::SourceNotFound { source_name }
            | LoadError::Read { source_name, .. }
            | LoadError::Parse { source_name, .. }
            | LoadError::NoTextColumn { source_name }
            | LoadError::EmptySource { source_name } => Some(source_name),
            LoadError::NoSources | LoadError::AllSourcesFailed { .. } => None,
        }
    }
}

fn describe_failures(failures: &[SourceFailure]) -> String {
    failures
        .iter()
        .map(|f| f.error.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while building or reading a category rule table.
#[derive(Error, Debug)]
pub enum RuleError {
    /// The rule table has no rules at all.
    #[error("Rule table is empty")]
    Empty,

    /// Two rules share a category name.
    #[error("Duplicate category in rule table: {0}")]
    DuplicateCategory(String),

    /// A rule has a blank category name.
    #[error("Rule at position {0} has an empty category name")]
    EmptyCategoryName(usize),

    /// A rule tries to claim the fallback category name.
    #[error("Category name is reserved: {0}")]
    ReservedCategory(String),

    /// A rule has no non-blank keywords and could never match.
    #[error("Category {category} has no keywords")]
    NoKeywords { category: String },

    /// A rules file could not be read.
    #[error("Failed to read rules file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rules file is not valid JSON for the rule schema.
    #[error("Invalid rules file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// All errors produced by the complaint triage crates.
#[derive(Error, Debug)]
pub enum TriageError {
    /// Loading one or more sources failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The rule table is invalid.
    #[error(transparent)]
    Rules(#[from] RuleError),

    /// A filter referenced a category outside the configured set.
    #[error("Unknown category: {name}")]
    UnknownCategory { name: String },

    /// A filter referenced a business goal outside the configured set.
    #[error("Unknown business goal: {goal}")]
    UnknownBusinessGoal { goal: String },

    /// A query ran before any dataset was loaded.
    #[error("No data loaded; call load() first")]
    NotLoaded,
}

/// Convenience alias used throughout the triage crates.
pub type Result<T> = std::result::Result<T, TriageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_source_not_found() {
        let err = LoadError::SourceNotFound {
            source_name: "data/complaints.csv".to_string(),
        };
        assert_eq!(err.to_string(), "Source not found: data/complaints.csv");
    }

    #[test]
    fn test_error_display_read_includes_io_message() {
        let err = LoadError::Read {
            source_name: "a.csv".to_string(),
            io: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("a.csv"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_display_all_sources_failed_lists_each() {
        let err = LoadError::AllSourcesFailed {
            failures: vec![
                SourceFailure {
                    source_name: "a.csv".to_string(),
                    error: LoadError::EmptySource {
                        source_name: "a.csv".to_string(),
                    },
                },
                SourceFailure {
                    source_name: "b.csv".to_string(),
                    error: LoadError::SourceNotFound {
                        source_name: "b.csv".to_string(),
                    },
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("All 2 sources failed to load"));
        assert!(msg.contains("Source a.csv contains no usable rows"));
        assert!(msg.contains("Source not found: b.csv"));
    }

    #[test]
    fn test_load_error_source_name() {
        let err = LoadError::NoTextColumn {
            source_name: "x.csv".to_string(),
        };
        assert_eq!(err.source_name(), Some("x.csv"));
        assert_eq!(LoadError::NoSources.source_name(), None);
    }

    #[test]
    fn test_error_display_unknown_category() {
        let err = TriageError::UnknownCategory {
            name: "Weather".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown category: Weather");
    }

    #[test]
    fn test_error_display_not_loaded() {
        assert_eq!(
            TriageError::NotLoaded.to_string(),
            "No data loaded; call load() first"
        );
    }

    #[test]
    fn test_error_from_load_is_transparent() {
        let err: TriageError = LoadError::NoSources.into();
        assert!(matches!(err, TriageError::Load(LoadError::NoSources)));
        assert_eq!(err.to_string(), "No sources given");
    }

    #[test]
    fn test_error_display_rule_duplicate() {
        let err: TriageError = RuleError::DuplicateCategory("Billing".to_string()).into();
        assert_eq!(err.to_string(), "Duplicate category in rule table: Billing");
    }
}
