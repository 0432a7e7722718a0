//! Error types for the core engine
//!
//! Provides error handling for:
//! - Tabular source validation (sheet → records)
//! - Page and roster assembly (records → body)
//! - Marker-delimited patching (body → body)

/// Fixed diagnostic shown when the tabular source cannot be turned into records
pub const MALFORMED_SOURCE_DIAGNOSTIC: &str =
    "Error: the requirement sheet is malformed (missing header values or a row wider than the header). Nothing was generated.";

/// Fixed banner substituted for a body whose mandatory fields are missing
pub const ERROR_BANNER: &str =
    "> **Generation failed:** a requirement is missing its Title or Description. Fix the sheet and synchronize again.\n{.is-danger}\n";

/// Errors while building field records from the tabular source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// No header row at all
    #[error("sheet has no header row")]
    EmptySheet,

    /// A header cell is empty
    #[error("header column {column} is empty")]
    EmptyHeader { column: usize },

    /// Header appears twice
    #[error("header '{name}' appears more than once")]
    DuplicateHeader { name: String },

    /// Data row has more populated cells than the header row
    #[error("row {row} has {populated} populated columns but the header only has {header_width}")]
    RowTooWide {
        row: usize,
        populated: usize,
        header_width: usize,
    },
}

impl RecordError {
    /// Operator-visible diagnostic for this error
    #[inline]
    #[must_use]
    pub fn diagnostic(&self) -> String {
        format!("{MALFORMED_SOURCE_DIAGNOSTIC} ({self})")
    }
}

/// Errors while assembling a document body
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssembleError {
    /// Title or Description (or the ID itself) is absent
    #[error("requirement '{record}' is missing mandatory field '{field}'")]
    MandatoryFieldMissing { record: String, field: &'static str },
}

impl AssembleError {
    /// Create mandatory field error
    pub fn missing(record: impl Into<String>, field: &'static str) -> Self {
        Self::MandatoryFieldMissing {
            record: record.into(),
            field,
        }
    }
}

/// Errors while patching a marker-delimited region
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    /// Start or end marker is missing
    #[error("marker region for '{id}' not found")]
    MarkerNotFound { id: String },

    /// Marker occurs a number of times other than two
    #[error("marker for '{id}' occurs {occurrences} times, expected exactly 2")]
    UnbalancedMarkers { id: String, occurrences: usize },
}

impl PatchError {
    /// Create marker-not-found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::MarkerNotFound { id: id.into() }
    }
}
