//! Table validation subsystem.
//!
//! Tabular pipeline datasets are checked against named column-level schemas
//! before they are persisted downstream.
//!
//! # Design principles
//!
//! - Schemas are declared once at startup and immutable afterwards
//! - Name → schema → validate; the registry is the only lookup path
//! - Collect-all: every violation is reported, not just the first
//! - Declared coercions are applied before constraints are checked
//! - Deterministic validation, no I/O

mod errors;
mod frame;
mod registry;
mod types;
mod validator;

pub use errors::{TableError, TableResult, Violation};
pub use frame::{CellValue, Column, Frame, FrameError, FrameResult};
pub use registry::TableSchemaRegistry;
pub use types::{ColumnDef, ColumnType, TableCheck, TableSchema};
pub use validator::{validate, TableValidator};
