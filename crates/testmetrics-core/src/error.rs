//! Input and configuration error types.
//!
//! Defined in `testmetrics-core` so every layer can classify a load failure
//! (schema vs. value) without string matching.

use thiserror::Error;

/// Broad class of a [`NormalizeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The header or column layout is unusable.
    Schema,
    /// A cell does not hold a usable number.
    Type,
}

/// Errors raised while normalizing a raw two-level-header table.
///
/// Rows are reported 1-based, counted from the first data row.
#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    /// The header does not have exactly two levels of equal width.
    #[error("malformed header: {0}")]
    Header(String),

    /// No column is labelled `date`.
    #[error("no `date` column found in the first header row")]
    MissingDateColumn,

    /// More than one column is labelled `date`.
    #[error("multiple `date` columns found (columns {first} and {second})")]
    MultipleDateColumns { first: usize, second: usize },

    /// A header label that must be present is blank.
    #[error("blank {level} header label in column {column}")]
    BlankLabel { level: &'static str, column: usize },

    /// Two columns flatten to the same name.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// A subject label clashes with the aggregate column prefix.
    #[error("'{0}' cannot be used as a subject name (reserved for aggregate columns)")]
    ReservedSubject(String),

    /// A subject lacks one of `attempted`, `wrong`, `unattempt`.
    #[error("subject '{subject}' is missing required field '{field}'")]
    MissingField { subject: String, field: &'static str },

    /// A data row has a different number of cells than the header.
    #[error("row {row} has {found} cells, header has {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A cell is empty, non-numeric, NaN or infinite.
    #[error("row {row}, column '{column}': '{value}' is not a number")]
    NotNumeric {
        row: usize,
        column: String,
        value: String,
    },

    /// A subject counter is below zero.
    #[error("row {row}, column '{column}': count {value} is negative")]
    NegativeCount {
        row: usize,
        column: String,
        value: f64,
    },
}

impl NormalizeError {
    /// Classify this error as a schema or a value problem.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NormalizeError::NotNumeric { .. } | NormalizeError::NegativeCount { .. } => {
                ErrorKind::Type
            }
            _ => ErrorKind::Schema,
        }
    }

    /// Returns `true` if the table layout itself is unusable.
    pub fn is_schema(&self) -> bool {
        self.kind() == ErrorKind::Schema
    }
}

/// Errors from constructing a marking scheme.
#[derive(Debug, Error, PartialEq)]
pub enum MarkingError {
    /// A mark is NaN or infinite.
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    /// A mark is below zero. The negative mark is a magnitude.
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
}
