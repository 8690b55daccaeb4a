//! Table validator.
//!
//! Validation order per schema:
//! 1. Resolve the schema by name.
//! 2. Coerce cells to the declared column types (when the schema coerces).
//! 3. Evaluate every column constraint and table-level check.
//!
//! Unlike record validation this is collect-all: no check short-circuits,
//! every violation across all columns lands in the returned error.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use super::errors::{TableError, TableResult, Violation};
use super::frame::{CellValue, Column, Frame};
use super::registry::TableSchemaRegistry;
use super::types::{ColumnDef, ColumnType, TableCheck};

/// Validates a frame against the builtin registry.
///
/// Returns the frame with declared coercions applied, or a
/// `TableError::ValidationFailed` enumerating every violation.
pub fn validate(frame: Frame, schema_name: &str) -> TableResult<Frame> {
    TableValidator::new(TableSchemaRegistry::builtin()).validate(frame, schema_name)
}

/// Table validator backed by a schema registry.
///
/// The validator holds no state of its own; validation is deterministic
/// over its inputs.
pub struct TableValidator<'a> {
    registry: &'a TableSchemaRegistry,
}

impl<'a> TableValidator<'a> {
    /// Creates a validator backed by the given registry.
    pub fn new(registry: &'a TableSchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validates a frame against the named schema.
    pub fn validate(&self, mut frame: Frame, schema_name: &str) -> TableResult<Frame> {
        let schema = self.registry.get(schema_name)?;
        let mut violations = Vec::new();

        if schema.is_strict() {
            let undeclared: Vec<String> = frame
                .column_names()
                .filter(|name| schema.column_def(name).is_none())
                .map(String::from)
                .collect();
            for name in undeclared {
                violations.push(Violation::column(
                    name,
                    "no undeclared columns",
                    "undeclared column",
                ));
            }
        }

        for (name, def) in schema.columns() {
            match frame.column_mut(name) {
                None => violations.push(Violation::column(
                    name,
                    "column to be present",
                    "missing column",
                )),
                Some(column) => {
                    let skip = if schema.coerces() {
                        coerce_column(column, def, &mut violations)
                    } else {
                        HashSet::new()
                    };
                    check_column(column, def, &skip, &mut violations);
                }
            }
        }

        for check in schema.checks() {
            run_table_check(&frame, check, &mut violations);
        }

        if violations.is_empty() {
            Ok(frame)
        } else {
            Err(TableError::ValidationFailed {
                schema: schema_name.to_string(),
                violations,
            })
        }
    }
}

/// Coerces every cell to the declared type, in place.
///
/// Returns the rows whose cells could not be coerced; those rows already
/// carry a type violation and are skipped by the value checks.
fn coerce_column(
    column: &mut Column,
    def: &ColumnDef,
    violations: &mut Vec<Violation>,
) -> HashSet<usize> {
    let name = column.name().to_string();
    let target = def.column_type();
    let mut failed = HashSet::new();

    for (row, cell) in column.values_mut().iter_mut().enumerate() {
        match coerce_cell(cell, target) {
            Some(coerced) => *cell = coerced,
            None => {
                violations.push(Violation::cell(
                    &name,
                    row,
                    format!("value coercible to {}", target.type_name()),
                    cell.render(),
                ));
                failed.insert(row);
            }
        }
    }
    failed
}

/// Coerces one cell to the target type, `None` if not representable.
///
/// Nulls pass through untouched; nullability is a separate constraint.
fn coerce_cell(cell: &CellValue, target: ColumnType) -> Option<CellValue> {
    if cell.is_null() {
        return Some(CellValue::Null);
    }
    match target {
        ColumnType::DateTime => match cell {
            CellValue::DateTime(dt) => Some(CellValue::DateTime(*dt)),
            CellValue::Str(s) => parse_datetime(s).map(CellValue::DateTime),
            _ => None,
        },
        ColumnType::Float => match cell {
            CellValue::Float(x) => Some(CellValue::Float(*x)),
            CellValue::Int(i) => Some(CellValue::Float(*i as f64)),
            CellValue::Str(s) => s.trim().parse::<f64>().ok().map(CellValue::Float),
            _ => None,
        },
        ColumnType::Int => match cell {
            CellValue::Int(i) => Some(CellValue::Int(*i)),
            CellValue::Float(x) if x.fract() == 0.0 && x.is_finite() => {
                Some(CellValue::Int(*x as i64))
            }
            CellValue::Str(s) => s.trim().parse::<i64>().ok().map(CellValue::Int),
            _ => None,
        },
        ColumnType::Str => match cell {
            CellValue::Str(s) => Some(CellValue::Str(s.clone())),
            CellValue::Int(i) => Some(CellValue::Str(i.to_string())),
            CellValue::Float(x) => Some(CellValue::Str(x.to_string())),
            _ => None,
        },
    }
}

/// Accepted datetime renderings: ISO date, ISO datetime, RFC 3339.
fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_time(NaiveTime::MIN));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    None
}

/// Evaluates every declared constraint over a column's cells.
fn check_column(
    column: &Column,
    def: &ColumnDef,
    skip: &HashSet<usize>,
    violations: &mut Vec<Violation>,
) {
    let name = column.name();

    for (row, cell) in column.values().iter().enumerate() {
        if skip.contains(&row) {
            continue;
        }

        if cell.is_null() {
            if !def.is_nullable() {
                violations.push(Violation::cell(name, row, "non-null value", "null"));
            }
            continue;
        }

        if !type_matches(cell, def.column_type()) {
            violations.push(Violation::cell(
                name,
                row,
                format!("value of type {}", def.column_type().type_name()),
                cell.type_name(),
            ));
            continue;
        }

        if let Some(value) = numeric_value(cell) {
            let below = def.min().is_some_and(|lo| value < lo);
            let above = def.max().is_some_and(|hi| value > hi);
            if below || above {
                violations.push(Violation::cell(name, row, bounds_desc(def), cell.render()));
            }
        }

        if let (Some((lo, hi)), CellValue::Str(s)) = (def.length_bounds(), cell) {
            let len = s.chars().count();
            if len < lo || len > hi {
                violations.push(Violation::cell(
                    name,
                    row,
                    format!("string length in [{}, {}]", lo, hi),
                    format!("length {}", len),
                ));
            }
        }

        if let Some(allowed) = def.allowed() {
            if let Some(raw) = raw_form(cell) {
                if !allowed.iter().any(|a| *a == raw) {
                    violations.push(Violation::cell(
                        name,
                        row,
                        format!("value in {{{}}}", allowed.join(", ")),
                        cell.render(),
                    ));
                }
            }
        }
    }
}

/// Exact type match, except that float columns accept integer cells.
fn type_matches(cell: &CellValue, target: ColumnType) -> bool {
    match target {
        ColumnType::DateTime => matches!(cell, CellValue::DateTime(_)),
        ColumnType::Float => matches!(cell, CellValue::Float(_) | CellValue::Int(_)),
        ColumnType::Int => matches!(cell, CellValue::Int(_)),
        ColumnType::Str => matches!(cell, CellValue::Str(_)),
    }
}

fn numeric_value(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Int(i) => Some(*i as f64),
        CellValue::Float(x) => Some(*x),
        _ => None,
    }
}

/// Unquoted rendering used for membership and uniqueness keys.
fn raw_form(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Null => None,
        CellValue::Int(i) => Some(i.to_string()),
        CellValue::Float(x) => Some(x.to_string()),
        CellValue::Str(s) => Some(s.clone()),
        CellValue::DateTime(dt) => Some(dt.to_string()),
    }
}

fn bounds_desc(def: &ColumnDef) -> String {
    match (def.min(), def.max()) {
        (Some(lo), Some(hi)) => format!("value in [{}, {}]", lo, hi),
        (Some(lo), None) => format!("value >= {}", lo),
        (None, Some(hi)) => format!("value <= {}", hi),
        (None, None) => "value".into(),
    }
}

/// Evaluates one table-level check across all rows.
fn run_table_check(frame: &Frame, check: &TableCheck, violations: &mut Vec<Violation>) {
    match check {
        TableCheck::UniqueTogether(cols) => {
            // Skip silently if a key column is absent; the missing-column
            // violation is already recorded.
            let columns: Option<Vec<&Column>> = cols.iter().map(|c| frame.column(c)).collect();
            let Some(columns) = columns else { return };

            let label = cols.join(", ");
            let mut seen: HashSet<Vec<String>> = HashSet::new();
            for row in 0..frame.num_rows() {
                let key: Option<Vec<String>> =
                    columns.iter().map(|c| raw_form(&c.values()[row])).collect();
                let Some(key) = key else { continue };
                if !seen.insert(key.clone()) {
                    violations.push(Violation {
                        column: Some(label.clone()),
                        row: Some(row),
                        check: format!("unique ({})", label),
                        actual: format!("duplicate ({})", key.join(", ")),
                    });
                }
            }
        }
        TableCheck::IntValueInRange { column, min, max_exclusive } => {
            let Some(col) = frame.column(column) else { return };
            for (row, cell) in col.values().iter().enumerate() {
                if let CellValue::Int(i) = cell {
                    if i < min || i >= max_exclusive {
                        violations.push(Violation::cell(
                            column,
                            row,
                            format!("value in [{}, {})", min, max_exclusive),
                            cell.render(),
                        ));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::types::TableSchema;

    fn registry_with(schema: TableSchema) -> TableSchemaRegistry {
        let mut registry = TableSchemaRegistry::new();
        registry.register(schema).unwrap();
        registry
    }

    fn str_col(name: &str, values: &[&str]) -> Column {
        Column::new(
            name,
            values.iter().map(|s| CellValue::Str(s.to_string())).collect(),
        )
    }

    fn float_col(name: &str, values: &[f64]) -> Column {
        Column::new(name, values.iter().map(|v| CellValue::Float(*v)).collect())
    }

    #[test]
    fn test_coerce_string_to_datetime() {
        assert!(parse_datetime("2024-03-15").is_some());
        assert!(parse_datetime("2024-03-15T10:30:00").is_some());
        assert!(parse_datetime("2024-03-15 10:30:00").is_some());
        assert!(parse_datetime("2024-03-15T10:30:00+00:00").is_some());
        assert!(parse_datetime("not a date").is_none());
    }

    #[test]
    fn test_coerce_int_to_float() {
        let coerced = coerce_cell(&CellValue::Int(7), ColumnType::Float);
        assert_eq!(coerced, Some(CellValue::Float(7.0)));
    }

    #[test]
    fn test_coerce_integral_float_to_int() {
        assert_eq!(
            coerce_cell(&CellValue::Float(5.0), ColumnType::Int),
            Some(CellValue::Int(5))
        );
        assert_eq!(coerce_cell(&CellValue::Float(5.5), ColumnType::Int), None);
    }

    #[test]
    fn test_coerce_null_passes_through() {
        assert_eq!(
            coerce_cell(&CellValue::Null, ColumnType::DateTime),
            Some(CellValue::Null)
        );
    }

    #[test]
    fn test_non_coercible_cell_is_single_violation() {
        let schema = TableSchema::new("t")
            .column("when", ColumnDef::datetime())
            .coerce();
        let registry = registry_with(schema);
        let validator = TableValidator::new(&registry);

        let frame = Frame::from_columns(vec![str_col("when", &["2024-01-02", "garbage"])]).unwrap();
        let err = validator.validate(frame, "t").unwrap_err();
        let violations = err.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].row, Some(1));
        assert!(violations[0].check.contains("datetime"));
    }

    #[test]
    fn test_missing_declared_column_reported() {
        let schema = TableSchema::new("t")
            .column("a", ColumnDef::float())
            .column("b", ColumnDef::float());
        let registry = registry_with(schema);
        let validator = TableValidator::new(&registry);

        let frame = Frame::from_columns(vec![float_col("a", &[1.0])]).unwrap();
        let err = validator.validate(frame, "t").unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].column.as_deref(), Some("b"));
        assert_eq!(err.violations()[0].row, None);
    }

    #[test]
    fn test_strict_rejects_undeclared_column() {
        let schema = TableSchema::new("t").column("a", ColumnDef::float()).strict();
        let registry = registry_with(schema);
        let validator = TableValidator::new(&registry);

        let frame =
            Frame::from_columns(vec![float_col("a", &[1.0]), float_col("extra", &[2.0])]).unwrap();
        let err = validator.validate(frame, "t").unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].column.as_deref(), Some("extra"));
    }

    #[test]
    fn test_membership_constraint() {
        let schema = TableSchema::new("t")
            .column("ccy", ColumnDef::string().is_in(["USD", "EUR"]));
        let registry = registry_with(schema);
        let validator = TableValidator::new(&registry);

        let ok = Frame::from_columns(vec![str_col("ccy", &["USD", "EUR"])]).unwrap();
        assert!(validator.validate(ok, "t").is_ok());

        let bad = Frame::from_columns(vec![str_col("ccy", &["USD", "GBP"])]).unwrap();
        let err = validator.validate(bad, "t").unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].row, Some(1));
    }

    #[test]
    fn test_collects_all_violations() {
        let schema = TableSchema::new("t")
            .column("x", ColumnDef::float().ge(0.0))
            .column("name", ColumnDef::string().str_length(1, 3));
        let registry = registry_with(schema);
        let validator = TableValidator::new(&registry);

        let frame = Frame::from_columns(vec![
            float_col("x", &[-1.0, -2.0]),
            str_col("name", &["abcd", "ok"]),
        ])
        .unwrap();
        let err = validator.validate(frame, "t").unwrap_err();
        // Two range violations plus one length violation, none short-circuited.
        assert_eq!(err.violations().len(), 3);
    }

    #[test]
    fn test_unknown_schema() {
        let registry = TableSchemaRegistry::new();
        let validator = TableValidator::new(&registry);
        let result = validator.validate(Frame::new(), "missing");
        assert!(matches!(result, Err(TableError::UnknownSchema(_))));
    }

    #[test]
    fn test_null_rejected_unless_column_nullable() {
        let schema = TableSchema::new("t")
            .column("x", ColumnDef::float())
            .column("note", ColumnDef::string().nullable());
        let registry = registry_with(schema);
        let validator = TableValidator::new(&registry);

        let frame = Frame::from_columns(vec![
            Column::new("x", vec![CellValue::Null]),
            Column::new("note", vec![CellValue::Null]),
        ])
        .unwrap();
        let err = validator.validate(frame, "t").unwrap_err();
        // Only the non-nullable column reports the null.
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].column.as_deref(), Some("x"));
    }

    #[test]
    fn test_float_column_accepts_int_cells_without_coercion() {
        let schema = TableSchema::new("t").column("x", ColumnDef::float().ge(0.0));
        let registry = registry_with(schema);
        let validator = TableValidator::new(&registry);

        let frame =
            Frame::from_columns(vec![Column::new("x", vec![CellValue::Int(3)])]).unwrap();
        assert!(validator.validate(frame, "t").is_ok());
    }
}
