//! Table schema registry.
//!
//! Schemas are registered once and never mutated afterwards; re-registering
//! a name is an error. The builtin registry holds the pipeline's fixed table
//! declarations and is built lazily behind a `OnceLock`, which gives the
//! one-time initialization barrier concurrent callers need.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::errors::{TableError, TableResult};
use super::types::{ColumnDef, TableCheck, TableSchema};

/// Immutable mapping from table name to schema.
#[derive(Debug, Default)]
pub struct TableSchemaRegistry {
    schemas: HashMap<String, TableSchema>,
}

impl TableSchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema under its own name.
    ///
    /// Fails if the declaration is structurally invalid or the name is
    /// already taken (schemas are immutable once registered).
    pub fn register(&mut self, schema: TableSchema) -> Result<(), String> {
        schema.validate_structure()?;
        if self.schemas.contains_key(schema.name()) {
            return Err(format!("table schema '{}' already registered", schema.name()));
        }
        self.schemas.insert(schema.name().to_string(), schema);
        Ok(())
    }

    /// Looks up a schema by name.
    pub fn get(&self, name: &str) -> TableResult<&TableSchema> {
        self.schemas
            .get(name)
            .ok_or_else(|| TableError::UnknownSchema(name.to_string()))
    }

    /// Returns all registered schema names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Process-wide registry of the pipeline's table schemas.
    pub fn builtin() -> &'static TableSchemaRegistry {
        static BUILTIN: OnceLock<TableSchemaRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let mut registry = TableSchemaRegistry::new();
            // Builtin declarations are fixed and covered by tests; insert
            // directly so initialization is infallible.
            for schema in [yield_curve(), risk_factors(), portfolio_value()] {
                registry.schemas.insert(schema.name().to_string(), schema);
            }
            registry
        })
    }
}

/// Zero-coupon yield curve points.
fn yield_curve() -> TableSchema {
    TableSchema::new("yield_curve")
        .column("date", ColumnDef::datetime())
        .column(
            "maturity",
            ColumnDef::float().ge(0.0).describe("Years to maturity"),
        )
        .column(
            "rate",
            ColumnDef::float()
                .in_range(-0.10, 1.00)
                .describe("Annualized rate (10% = 0.10)"),
        )
        .strict()
        .coerce()
}

/// Market risk factor observations, one row per (date, factor).
fn risk_factors() -> TableSchema {
    TableSchema::new("risk_factors")
        .column("date", ColumnDef::datetime())
        .column("factor_id", ColumnDef::string().str_length(1, 40))
        .column("value", ColumnDef::float())
        .strict()
        .coerce()
        .check(TableCheck::UniqueTogether(vec![
            "date".into(),
            "factor_id".into(),
        ]))
}

/// Simulated portfolio valuations, one row per (date, scenario).
fn portfolio_value() -> TableSchema {
    TableSchema::new("portfolio_value")
        .column("date", ColumnDef::datetime())
        .column("scenario_id", ColumnDef::int().ge(0.0))
        .column("value", ColumnDef::float())
        .strict()
        .coerce()
        .check(TableCheck::UniqueTogether(vec![
            "date".into(),
            "scenario_id".into(),
        ]))
        .check(TableCheck::IntValueInRange {
            column: "scenario_id".into(),
            min: 0,
            max_exclusive: 10_000_000,
        })
}
