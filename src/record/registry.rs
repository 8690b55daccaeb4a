//! Record schema registry.
//!
//! Each registered model pairs a declarative `RecordSchema` (what the
//! validator walks) with a typed decoder (what a conforming payload decodes
//! into). Built once behind a `OnceLock`, immutable afterwards.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde_json::Value;

use super::errors::{RecordError, RecordResult};
use super::models::{BacktestMetrics, ValidatedRecord};
use super::types::{FieldDef, RecordSchema};

/// Decodes an already-validated payload into its typed model.
pub type RecordDecoder = fn(&Value) -> Result<ValidatedRecord, serde_json::Error>;

/// One registered record model: declarative schema plus typed decoder.
pub struct RecordModelDef {
    schema: RecordSchema,
    decoder: RecordDecoder,
}

impl RecordModelDef {
    pub fn new(schema: RecordSchema, decoder: RecordDecoder) -> Self {
        Self { schema, decoder }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn decode(&self, payload: &Value) -> Result<ValidatedRecord, serde_json::Error> {
        (self.decoder)(payload)
    }
}

/// Immutable mapping from model name to record model definition.
#[derive(Default)]
pub struct RecordSchemaRegistry {
    models: HashMap<String, RecordModelDef>,
}

impl RecordSchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model under its schema name.
    ///
    /// Fails if the name is already taken (models are immutable once
    /// registered).
    pub fn register(&mut self, model: RecordModelDef) -> Result<(), String> {
        let name = model.schema().name().to_string();
        if self.models.contains_key(&name) {
            return Err(format!("record model '{}' already registered", name));
        }
        self.models.insert(name, model);
        Ok(())
    }

    /// Looks up a model by name.
    pub fn get(&self, name: &str) -> RecordResult<&RecordModelDef> {
        self.models
            .get(name)
            .ok_or_else(|| RecordError::UnknownModel(name.to_string()))
    }

    /// Returns all registered model names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Process-wide registry of the pipeline's record models.
    pub fn builtin() -> &'static RecordSchemaRegistry {
        static BUILTIN: OnceLock<RecordSchemaRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let mut registry = RecordSchemaRegistry::new();
            registry.models.insert(
                "backtest_metrics".into(),
                RecordModelDef::new(backtest_metrics(), decode_backtest_metrics),
            );
            registry
        })
    }
}

/// One tail-risk block: VaR and Expected Shortfall share this shape.
fn var_block(name: &str) -> RecordSchema {
    RecordSchema::new(name)
        .field("confidence", FieldDef::one_of([0.95, 0.99, 0.995]))
        .field("horizon_days", FieldDef::int().ge(1.0).le(30.0))
        .field("value", FieldDef::float())
}

fn kupiec_block() -> RecordSchema {
    RecordSchema::new("kupiec")
        .field("alpha", FieldDef::float().ge(0.0).le(1.0))
        .field("failures", FieldDef::int().ge(0.0))
        .field("p_value", FieldDef::float())
}

/// Backtest metrics report shape.
///
/// The `var` block carries the falsy-to-empty normalization for legacy
/// payloads that shipped the block under a differently-cased key.
fn backtest_metrics() -> RecordSchema {
    RecordSchema::new("backtest_metrics")
        .field("as_of", FieldDef::date())
        .field("portfolio", FieldDef::string())
        .field(
            "var",
            FieldDef::record(var_block("var")).empty_record_if_falsy(),
        )
        .field("es", FieldDef::record(var_block("es")))
        .field("kupiec", FieldDef::record(kupiec_block()))
}

fn decode_backtest_metrics(payload: &Value) -> Result<ValidatedRecord, serde_json::Error> {
    serde_json::from_value::<BacktestMetrics>(payload.clone())
        .map(ValidatedRecord::BacktestMetrics)
}
