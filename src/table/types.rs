//! Table schema definitions.
//!
//! A `TableSchema` is a named, ordered set of `ColumnDef`s plus table-level
//! checks. Schemas are declared once at process start and never mutated.
//!
//! Joint satisfiability: a constraint must be checkable for the declared
//! column type. Numeric bounds apply to `Float`/`Int` columns only, string
//! length bounds to `Str` columns only. `validate_structure` enforces this
//! before a schema is admitted to a registry.

/// Semantic column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    DateTime,
    Float,
    Int,
    Str,
}

impl ColumnType {
    /// Returns the type name for violation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::DateTime => "datetime",
            ColumnType::Float => "float",
            ColumnType::Int => "int",
            ColumnType::Str => "string",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Float | ColumnType::Int)
    }
}

/// A single column's type and constraints.
///
/// Columns reject nulls unless explicitly marked `nullable()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    column_type: ColumnType,
    nullable: bool,
    /// Inclusive numeric bounds; either side may be open
    min: Option<f64>,
    max: Option<f64>,
    /// Inclusive string length bounds
    str_length: Option<(usize, usize)>,
    /// Allowed-value set, rendered form
    allowed: Option<Vec<String>>,
    description: Option<String>,
}

impl ColumnDef {
    fn with_type(column_type: ColumnType) -> Self {
        Self {
            column_type,
            nullable: false,
            min: None,
            max: None,
            str_length: None,
            allowed: None,
            description: None,
        }
    }

    /// Create a datetime column
    pub fn datetime() -> Self {
        Self::with_type(ColumnType::DateTime)
    }

    /// Create a float column
    pub fn float() -> Self {
        Self::with_type(ColumnType::Float)
    }

    /// Create an integer column
    pub fn int() -> Self {
        Self::with_type(ColumnType::Int)
    }

    /// Create a string column
    pub fn string() -> Self {
        Self::with_type(ColumnType::Str)
    }

    /// Permit nulls in this column
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Lower inclusive numeric bound
    pub fn ge(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Inclusive numeric range [lo, hi]
    pub fn in_range(mut self, lo: f64, hi: f64) -> Self {
        self.min = Some(lo);
        self.max = Some(hi);
        self
    }

    /// Inclusive string length bounds
    pub fn str_length(mut self, min: usize, max: usize) -> Self {
        self.str_length = Some((min, max));
        self
    }

    /// Restrict values to an enumerated set (rendered form, see `CellValue::render`)
    pub fn is_in(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a free-text description
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn length_bounds(&self) -> Option<(usize, usize)> {
        self.str_length
    }

    pub fn allowed(&self) -> Option<&[String]> {
        self.allowed.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Checks that the declared constraints are satisfiable for the type.
    fn check_satisfiable(&self, column: &str) -> Result<(), String> {
        if (self.min.is_some() || self.max.is_some()) && !self.column_type.is_numeric() {
            return Err(format!(
                "column '{}': numeric bounds declared on {} column",
                column,
                self.column_type.type_name()
            ));
        }
        if self.str_length.is_some() && self.column_type != ColumnType::Str {
            return Err(format!(
                "column '{}': string length bounds declared on {} column",
                column,
                self.column_type.type_name()
            ));
        }
        if let (Some(lo), Some(hi)) = (self.min, self.max) {
            if lo > hi {
                return Err(format!("column '{}': empty numeric range [{}, {}]", column, lo, hi));
            }
        }
        if let Some((lo, hi)) = self.str_length {
            if lo > hi {
                return Err(format!("column '{}': empty length range [{}, {}]", column, lo, hi));
            }
        }
        Ok(())
    }
}

/// Table-level checks evaluated across rows.
#[derive(Debug, Clone, PartialEq)]
pub enum TableCheck {
    /// The tuple of values over these columns must be unique per row
    UniqueTogether(Vec<String>),
    /// Integer column values must fall in [min, max_exclusive)
    IntValueInRange {
        column: String,
        min: i64,
        max_exclusive: i64,
    },
}

/// A named, immutable column-level schema for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    name: String,
    columns: Vec<(String, ColumnDef)>,
    strict: bool,
    coerce: bool,
    checks: Vec<TableCheck>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            strict: false,
            coerce: false,
            checks: Vec::new(),
        }
    }

    /// Declare a column. Declaration order is preserved.
    pub fn column(mut self, name: impl Into<String>, def: ColumnDef) -> Self {
        self.columns.push((name.into(), def));
        self
    }

    /// Reject columns not declared in this schema
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Coerce cell values to the declared types before checking constraints
    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }

    /// Add a table-level check
    pub fn check(mut self, check: TableCheck) -> Self {
        self.checks.push(check);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[(String, ColumnDef)] {
        &self.columns
    }

    pub fn column_def(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn coerces(&self) -> bool {
        self.coerce
    }

    pub fn checks(&self) -> &[TableCheck] {
        &self.checks
    }

    /// Validates the schema declaration itself (not a dataset).
    ///
    /// Every constraint must be jointly satisfiable with its column type,
    /// and table-level checks may only reference declared columns.
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("schema name must not be empty".into());
        }
        if self.columns.is_empty() {
            return Err(format!("schema '{}' declares no columns", self.name));
        }
        for (name, def) in &self.columns {
            def.check_satisfiable(name)?;
        }
        for check in &self.checks {
            match check {
                TableCheck::UniqueTogether(cols) => {
                    for col in cols {
                        if self.column_def(col).is_none() {
                            return Err(format!(
                                "uniqueness check references undeclared column '{}'",
                                col
                            ));
                        }
                    }
                }
                TableCheck::IntValueInRange { column, min, max_exclusive } => {
                    match self.column_def(column) {
                        None => {
                            return Err(format!(
                                "range check references undeclared column '{}'",
                                column
                            ));
                        }
                        Some(def) if def.column_type() != ColumnType::Int => {
                            return Err(format!(
                                "integer range check on non-integer column '{}'",
                                column
                            ));
                        }
                        Some(_) => {}
                    }
                    if min >= max_exclusive {
                        return Err(format!(
                            "empty integer range [{}, {}) on column '{}'",
                            min, max_exclusive, column
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> TableSchema {
        TableSchema::new("prices")
            .column("date", ColumnDef::datetime())
            .column("price", ColumnDef::float().ge(0.0))
            .strict()
            .coerce()
    }

    #[test]
    fn test_schema_structure_valid() {
        assert!(sample_schema().validate_structure().is_ok());
    }

    #[test]
    fn test_columns_reject_nulls_by_default() {
        assert!(!ColumnDef::float().is_nullable());
        assert!(ColumnDef::float().nullable().is_nullable());
    }

    #[test]
    fn test_numeric_bounds_on_string_rejected() {
        let schema = TableSchema::new("bad").column("id", ColumnDef::string().ge(0.0));
        let result = schema.validate_structure();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("numeric bounds"));
    }

    #[test]
    fn test_length_bounds_on_float_rejected() {
        let schema = TableSchema::new("bad").column("value", ColumnDef::float().str_length(1, 4));
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_empty_range_rejected() {
        let schema = TableSchema::new("bad").column("value", ColumnDef::float().in_range(1.0, 0.0));
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_unique_check_must_reference_declared_columns() {
        let schema = sample_schema().check(TableCheck::UniqueTogether(vec!["nope".into()]));
        let result = schema.validate_structure();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("nope"));
    }

    #[test]
    fn test_int_range_check_requires_int_column() {
        let schema = sample_schema().check(TableCheck::IntValueInRange {
            column: "price".into(),
            min: 0,
            max_exclusive: 10,
        });
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_no_columns_rejected() {
        assert!(TableSchema::new("empty").validate_structure().is_err());
    }

    #[test]
    fn test_column_declaration_order_preserved() {
        let schema = sample_schema();
        let names: Vec<_> = schema.columns().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["date", "price"]);
    }
}
