//! Record validation subsystem.
//!
//! JSON-like metrics payloads are parsed and validated into strongly-typed
//! records before persistence.
//!
//! # Design principles
//!
//! - Models are declared once at startup and immutable afterwards
//! - Name → schema → validate; the registry is the only lookup path
//! - Fail-fast: the first violation, in field declaration order, stops the walk
//! - Normalization is an explicit pre-validation transform
//! - Deterministic validation, no I/O

mod errors;
mod models;
mod registry;
mod types;
mod validator;

pub use errors::{FieldViolation, RecordError, RecordResult};
pub use models::{BacktestMetrics, KupiecTest, VaRMetric, ValidatedRecord};
pub use registry::{RecordDecoder, RecordModelDef, RecordSchemaRegistry};
pub use types::{FieldDef, FieldType, Normalize, RecordSchema};
pub use validator::{validate_record, RecordValidator};
