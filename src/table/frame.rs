//! In-memory tabular dataset.
//!
//! A `Frame` is an ordered collection of named columns; rows are aligned by
//! position across columns. Frames carry no schema of their own — they are
//! the raw input a `TableValidator` checks and coerces.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Result type for frame construction
pub type FrameResult<T> = Result<T, FrameError>;

/// Frame construction errors
#[derive(Debug, Error)]
pub enum FrameError {
    /// Column lengths must agree with the rows already present
    #[error("column '{column}' has {got} values, frame has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    /// Column names must be unique within a frame
    #[error("column '{0}' already present in frame")]
    DuplicateColumn(String),
}

/// A single cell in a frame.
///
/// `Null` is a first-class value so that nullability is a constraint checked
/// by the validator rather than a property of the container.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Returns the type name for violation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Int(_) => "int",
            CellValue::Float(_) => "float",
            CellValue::Str(_) => "string",
            CellValue::DateTime(_) => "datetime",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Renders the value for violation messages
    pub fn render(&self) -> String {
        match self {
            CellValue::Null => "null".into(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(x) => x.to_string(),
            CellValue::Str(s) => format!("'{}'", s),
            CellValue::DateTime(dt) => dt.to_string(),
        }
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn values_mut(&mut self) -> &mut Vec<CellValue> {
        &mut self.values
    }
}

/// An ordered set of equal-length named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<Column>,
}

impl Frame {
    /// Creates an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a frame from columns, enforcing equal lengths and unique names.
    pub fn from_columns(columns: Vec<Column>) -> FrameResult<Self> {
        let mut frame = Self::new();
        for column in columns {
            frame.push_column(column)?;
        }
        Ok(frame)
    }

    /// Appends a column, enforcing length agreement and name uniqueness.
    pub fn push_column(&mut self, column: Column) -> FrameResult<()> {
        if self.column(column.name()).is_some() {
            return Err(FrameError::DuplicateColumn(column.name().to_string()));
        }
        if let Some(first) = self.columns.first() {
            if column.len() != first.len() {
                return Err(FrameError::LengthMismatch {
                    column: column.name().to_string(),
                    expected: first.len(),
                    got: column.len(),
                });
            }
        }
        self.columns.push(column);
        Ok(())
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name() == name)
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name())
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_col(name: &str, values: &[f64]) -> Column {
        Column::new(name, values.iter().map(|v| CellValue::Float(*v)).collect())
    }

    #[test]
    fn test_from_columns_equal_lengths() {
        let frame = Frame::from_columns(vec![
            float_col("a", &[1.0, 2.0]),
            float_col("b", &[3.0, 4.0]),
        ])
        .unwrap();
        assert_eq!(frame.num_rows(), 2);
        assert_eq!(frame.num_columns(), 2);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = Frame::from_columns(vec![
            float_col("a", &[1.0, 2.0]),
            float_col("b", &[3.0]),
        ]);
        assert!(matches!(result, Err(FrameError::LengthMismatch { .. })));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = Frame::from_columns(vec![
            float_col("a", &[1.0]),
            float_col("a", &[2.0]),
        ]);
        assert!(matches!(result, Err(FrameError::DuplicateColumn(_))));
    }

    #[test]
    fn test_column_lookup() {
        let frame = Frame::from_columns(vec![float_col("rate", &[0.05])]).unwrap();
        assert!(frame.column("rate").is_some());
        assert!(frame.column("missing").is_none());
        assert_eq!(frame.column_names().collect::<Vec<_>>(), vec!["rate"]);
    }

    #[test]
    fn test_cell_type_names() {
        assert_eq!(CellValue::Null.type_name(), "null");
        assert_eq!(CellValue::Int(1).type_name(), "int");
        assert_eq!(CellValue::Float(1.0).type_name(), "float");
        assert_eq!(CellValue::Str("x".into()).type_name(), "string");
    }
}
