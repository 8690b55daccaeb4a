//! riskschema - strict schema validation for financial risk pipeline data
//!
//! Two independent validation surfaces share one registry pattern:
//! tabular datasets are checked column-by-column with a collect-all error
//! policy, JSON metrics payloads are parsed into typed records with a
//! fail-fast policy.

pub mod record;
pub mod table;

pub use record::validate_record;
pub use table::validate;
