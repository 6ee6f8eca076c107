//! CSV source discovery and loading.
//!
//! Turns files, directories of files and in-memory buffers into one ordered
//! sequence of [`ComplaintRecord`]s, picking the complaint-text column of
//! each source from a list of known header aliases.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};
use triage_core::error::{LoadError, SourceFailure};
use triage_core::models::ComplaintRecord;

/// Header aliases for the complaint-text column, in priority order.
///
/// Compared after [`normalize_header`], so case, `_`, `-` and repeated
/// whitespace are ignored.
pub const TEXT_COLUMN_ALIASES: &[&str] = &[
    "Customer Complaint",
    "Complaint Text",
    "Complaint",
    "Text",
    "Description",
    "Issue",
    "Message",
    "complaint_text",
];

// ── Sources ───────────────────────────────────────────────────────────────────

/// One tabular input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A CSV file, or a directory scanned recursively for `.csv` files.
    Path(PathBuf),
    /// CSV bytes already in memory, labelled with `name`.
    Memory { name: String, data: Vec<u8> },
}

impl Source {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Source::Path(path.into())
    }

    pub fn memory(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Source::Memory {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Identifier used in records, summaries and errors.
    pub fn name(&self) -> String {
        match self {
            Source::Path(path) => path.display().to_string(),
            Source::Memory { name, .. } => name.clone(),
        }
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

// ── Options & outcome ─────────────────────────────────────────────────────────

/// What to do when one of several sources fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Skip failed sources and report them in [`LoadOutcome::failures`].
    /// The load fails only when no source produced any record.
    #[default]
    Partial,
    /// Abort on the first failing source.
    FailFast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    pub policy: LoadPolicy,
    /// Drop rows whose complaint text is blank after trimming.
    pub drop_blank_text: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            policy: LoadPolicy::Partial,
            drop_blank_text: true,
        }
    }
}

/// Per-source statistics for a successfully loaded source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub source: String,
    /// Header of the column the complaint text was read from.
    pub text_column: String,
    /// Data rows seen, blank ones included.
    pub rows_read: usize,
    /// Records produced after blank rows were dropped.
    pub records: usize,
}

/// Result of a multi-source load.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// All records, in source order then row order.
    pub records: Vec<ComplaintRecord>,
    pub sources: Vec<SourceSummary>,
    /// Sources skipped under [`LoadPolicy::Partial`].
    pub failures: Vec<SourceFailure>,
}

impl LoadOutcome {
    /// `true` when at least one source was skipped.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Lower-case a header and collapse `_`, `-` and whitespace runs to one space.
pub fn normalize_header(header: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let re = SEPARATORS.get_or_init(|| Regex::new(r"[\s_\-]+").expect("regex is valid"));
    let stripped = header.trim_matches('\u{feff}').trim().to_lowercase();
    re.replace_all(&stripped, " ").trim().to_string()
}

/// Index of the complaint-text column.
///
/// The first alias in [`TEXT_COLUMN_ALIASES`] order that matches a header
/// wins; otherwise the first column. `None` only when there are no headers.
pub fn detect_text_column<S: AsRef<str>>(headers: &[S]) -> Option<usize> {
    if headers.is_empty() {
        return None;
    }
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();
    TEXT_COLUMN_ALIASES
        .iter()
        .map(|alias| normalize_header(alias))
        .find_map(|alias| normalized.iter().position(|h| *h == alias))
        .or(Some(0))
}

/// Find all `.csv` files recursively under `dir`, sorted by path.
pub fn find_csv_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Data path does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load a single file or in-memory source.
///
/// Directories are not accepted here; [`load_sources`] expands them first.
pub fn load_source(
    source: &Source,
    options: &LoaderOptions,
) -> Result<(Vec<ComplaintRecord>, SourceSummary), LoadError> {
    let name = source.name();
    match source {
        Source::Path(path) => {
            let file = File::open(path).map_err(|io| {
                if io.kind() == std::io::ErrorKind::NotFound {
                    LoadError::SourceNotFound {
                        source_name: name.clone(),
                    }
                } else {
                    LoadError::Read {
                        source_name: name.clone(),
                        io,
                    }
                }
            })?;
            read_csv(file, &name, options)
        }
        Source::Memory { data, .. } => read_csv(data.as_slice(), &name, options),
    }
}

/// Load every source and concatenate the records in order.
///
/// Failures are handled according to [`LoaderOptions::policy`]. Under
/// [`LoadPolicy::Partial`] a load where every source failed returns that
/// source's own error when there was exactly one, and
/// [`LoadError::AllSourcesFailed`] otherwise.
pub fn load_sources(
    sources: impl IntoIterator<Item = Source>,
    options: &LoaderOptions,
) -> Result<LoadOutcome, LoadError> {
    let mut outcome = LoadOutcome::default();
    let mut attempted = 0usize;

    for source in sources {
        let units: Vec<Source> = match source {
            Source::Path(path) if path.is_dir() => {
                let files = find_csv_files(&path);
                if files.is_empty() {
                    attempted += 1;
                    let error = LoadError::EmptySource {
                        source_name: path.display().to_string(),
                    };
                    record_failure(&mut outcome, options.policy, error)?;
                    continue;
                }
                debug!("Expanded {} into {} CSV files", path.display(), files.len());
                files.into_iter().map(Source::Path).collect()
            }
            other => vec![other],
        };

        for unit in units {
            attempted += 1;
            match load_source(&unit, options) {
                Ok((records, summary)) => {
                    debug!(
                        source = %summary.source,
                        text_column = %summary.text_column,
                        rows = summary.rows_read,
                        records = summary.records,
                        "loaded source"
                    );
                    outcome.records.extend(records);
                    outcome.sources.push(summary);
                }
                Err(error) => record_failure(&mut outcome, options.policy, error)?,
            }
        }
    }

    if attempted == 0 {
        return Err(LoadError::NoSources);
    }

    if outcome.sources.is_empty() {
        let mut failures = outcome.failures;
        if failures.len() == 1 {
            if let Some(only) = failures.pop() {
                return Err(only.error);
            }
        }
        return Err(LoadError::AllSourcesFailed { failures });
    }

    debug!(
        "Loaded {} records from {} sources ({} failed)",
        outcome.records.len(),
        outcome.sources.len(),
        outcome.failures.len()
    );

    Ok(outcome)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn record_failure(
    outcome: &mut LoadOutcome,
    policy: LoadPolicy,
    error: LoadError,
) -> Result<(), LoadError> {
    if policy == LoadPolicy::FailFast {
        return Err(error);
    }
    let source_name = error.source_name().unwrap_or_default().to_string();
    warn!(source = %source_name, error = %error, "skipping source");
    outcome.failures.push(SourceFailure { source_name, error });
    Ok(())
}

/// Parse CSV from `reader` into records for the detected text column.
fn read_csv<R: Read>(
    reader: R,
    source_name: &str,
    options: &LoaderOptions,
) -> Result<(Vec<ComplaintRecord>, SourceSummary), LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .byte_headers()
        .map_err(|e| map_csv_error(source_name, e))?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim_matches('\u{feff}').trim().to_string())
        .collect();

    let column = detect_text_column(&headers)
        .filter(|_| headers.iter().any(|h| !h.is_empty()))
        .ok_or_else(|| LoadError::NoTextColumn {
            source_name: source_name.to_string(),
        })?;

    let mut records = Vec::new();
    let mut rows_read = 0usize;

    for (row, result) in csv_reader.byte_records().enumerate() {
        let record = result.map_err(|e| map_csv_error(source_name, e))?;
        rows_read += 1;

        // Missing or undecodable cells count as empty text.
        let text = match record.get(column).map(std::str::from_utf8) {
            Some(Ok(text)) => text.to_string(),
            Some(Err(_)) => {
                debug!(source = %source_name, row, "cell is not valid UTF-8; treating as empty");
                String::new()
            }
            None => String::new(),
        };

        if options.drop_blank_text && text.trim().is_empty() {
            continue;
        }
        records.push(ComplaintRecord::new(text, source_name, row));
    }

    if records.is_empty() {
        return Err(LoadError::EmptySource {
            source_name: source_name.to_string(),
        });
    }

    let summary = SourceSummary {
        source: source_name.to_string(),
        text_column: headers[column].clone(),
        rows_read,
        records: records.len(),
    };
    Ok((records, summary))
}

fn map_csv_error(source_name: &str, err: csv::Error) -> LoadError {
    let message = err.to_string();
    if err.is_io_error() {
        if let csv::ErrorKind::Io(io) = err.into_kind() {
            return LoadError::Read {
                source_name: source_name.to_string(),
                io,
            };
        }
    }
    LoadError::Parse {
        source_name: source_name.to_string(),
        message,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
