//! Error types for table validation.
//!
//! Table validation is collect-all: every constraint violation found across
//! all columns and table-level checks is gathered into one
//! `TableError::ValidationFailed`, so a caller gets the complete diagnostic
//! in a single pass.

use std::fmt;

use thiserror::Error;

/// Result type for table validation operations
pub type TableResult<T> = Result<T, TableError>;

/// A single constraint failure.
///
/// `row` is the zero-based index of the offending row, or `None` for
/// violations that concern a whole column or the frame itself (missing
/// declared column, undeclared column under strict mode). For uniqueness
/// violations `column` carries the comma-joined key columns and `row` is
/// the index of the duplicate occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Offending column, `None` for frame-level violations
    pub column: Option<String>,
    /// Zero-based row index, `None` for column/frame-level violations
    pub row: Option<usize>,
    /// The constraint that failed, e.g. `"rate in [-0.1, 1]"`
    pub check: String,
    /// Rendering of the actual value or condition found
    pub actual: String,
}

impl Violation {
    pub fn cell(
        column: impl Into<String>,
        row: usize,
        check: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            column: Some(column.into()),
            row: Some(row),
            check: check.into(),
            actual: actual.into(),
        }
    }

    pub fn column(
        column: impl Into<String>,
        check: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            column: Some(column.into()),
            row: None,
            check: check.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.column, self.row) {
            (Some(col), Some(row)) => {
                write!(f, "column '{}' row {}: expected {}, got {}", col, row, self.check, self.actual)
            }
            (Some(col), None) => {
                write!(f, "column '{}': expected {}, got {}", col, self.check, self.actual)
            }
            _ => write!(f, "frame: expected {}, got {}", self.check, self.actual),
        }
    }
}

/// Table validation errors
#[derive(Debug, Error)]
pub enum TableError {
    /// Requested schema name is not registered
    #[error("table schema '{0}' not found")]
    UnknownSchema(String),

    /// One or more constraint violations were found
    #[error("schema '{schema}' validation failed with {} violation(s): {}", .violations.len(), summarize(.violations))]
    ValidationFailed {
        schema: String,
        violations: Vec<Violation>,
    },
}

impl TableError {
    /// Returns the collected violations, empty for non-validation errors.
    pub fn violations(&self) -> &[Violation] {
        match self {
            TableError::ValidationFailed { violations, .. } => violations,
            TableError::UnknownSchema(_) => &[],
        }
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
