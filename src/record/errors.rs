//! Error types for record validation.
//!
//! Record validation is fail-fast: the first constraint violation found, in
//! field declaration order and depth-first through nested blocks, stops the
//! walk. `path` locates the field with dot notation, e.g. `var.horizon_days`.

use thiserror::Error;

/// Result type for record validation operations
pub type RecordResult<T> = Result<T, RecordError>;

/// The nature of a single field failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldViolation {
    /// Required field absent or null
    #[error("required field is missing")]
    Missing,

    /// Value has the wrong JSON type
    #[error("expected {expected}, got {actual}")]
    WrongType {
        expected: &'static str,
        actual: &'static str,
    },

    /// Numeric value outside declared bounds
    #[error("value {value} outside {bounds}")]
    OutOfRange { value: f64, bounds: String },

    /// Value not one of the enumerated literals
    #[error("value {value} not in allowed set {{{allowed}}}")]
    NotInAllowedSet { value: String, allowed: String },
}

/// Record validation errors
#[derive(Debug, Clone, Error)]
pub enum RecordError {
    /// Requested model name is not registered
    #[error("record model '{0}' not found")]
    UnknownModel(String),

    /// First constraint violation found during the walk
    #[error("field '{path}': {violation}")]
    Validation {
        path: String,
        violation: FieldViolation,
    },

    /// Typed decode failed after a successful schema walk
    #[error("record decode failed: {0}")]
    Decode(String),
}

impl RecordError {
    pub fn validation(path: impl Into<String>, violation: FieldViolation) -> Self {
        RecordError::Validation {
            path: path.into(),
            violation,
        }
    }

    /// Field path of the violation, if this is a validation error.
    pub fn path(&self) -> Option<&str> {
        match self {
            RecordError::Validation { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_includes_path() {
        let err = RecordError::validation("var.horizon_days", FieldViolation::Missing);
        let display = err.to_string();
        assert!(display.contains("var.horizon_days"));
        assert!(display.contains("missing"));
    }

    #[test]
    fn test_not_in_allowed_set_display() {
        let err = RecordError::validation(
            "var.confidence",
            FieldViolation::NotInAllowedSet {
                value: "0.9".into(),
                allowed: "0.95, 0.99, 0.995".into(),
            },
        );
        let display = err.to_string();
        assert!(display.contains("0.9"));
        assert!(display.contains("0.95"));
    }

    #[test]
    fn test_path_accessor() {
        let err = RecordError::validation("kupiec.alpha", FieldViolation::Missing);
        assert_eq!(err.path(), Some("kupiec.alpha"));
        assert_eq!(RecordError::UnknownModel("x".into()).path(), None);
    }
}
