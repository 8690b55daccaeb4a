//! Record validator.
//!
//! Validation order per model:
//! 1. Resolve the model by name.
//! 2. Apply declared normalization rules to a working copy of the payload.
//! 3. Walk the schema in field declaration order, depth-first into nested
//!    blocks, failing on the FIRST violation.
//! 4. Decode the conforming payload into its typed model.
//!
//! Normalization is an explicit pre-validation transform, not something
//! buried in field access, so the legacy-payload rule stays auditable.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::errors::{FieldViolation, RecordError, RecordResult};
use super::models::ValidatedRecord;
use super::registry::RecordSchemaRegistry;
use super::types::{FieldDef, FieldType, Normalize, RecordSchema};

/// Validates a payload against the builtin registry.
///
/// Returns the fully-typed record, or the first constraint violation found.
pub fn validate_record(payload: &Value, model_name: &str) -> RecordResult<ValidatedRecord> {
    RecordValidator::new(RecordSchemaRegistry::builtin()).validate(payload, model_name)
}

/// Record validator backed by a model registry.
pub struct RecordValidator<'a> {
    registry: &'a RecordSchemaRegistry,
}

impl<'a> RecordValidator<'a> {
    /// Creates a validator backed by the given registry.
    pub fn new(registry: &'a RecordSchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validates a loosely-typed payload against the named model.
    pub fn validate(&self, payload: &Value, model_name: &str) -> RecordResult<ValidatedRecord> {
        let model = self.registry.get(model_name)?;

        let mut working = payload.clone();
        normalize(&mut working, model.schema());

        let obj = working.as_object().ok_or_else(|| {
            RecordError::validation(
                "$root",
                FieldViolation::WrongType {
                    expected: "object",
                    actual: json_type_name(&working),
                },
            )
        })?;
        check_record(model.schema(), obj, "")?;

        model
            .decode(&working)
            .map_err(|e| RecordError::Decode(e.to_string()))
    }
}

/// Applies normalization rules to the payload, recursing into nested blocks.
fn normalize(value: &mut Value, schema: &RecordSchema) {
    let Some(obj) = value.as_object_mut() else { return };
    for (name, def) in schema.fields() {
        if def.normalize() == Normalize::EmptyRecordIfFalsy && is_falsy(obj.get(name)) {
            obj.insert(name.clone(), Value::Object(Map::new()));
        }
        if let FieldType::Record(nested) = def.field_type() {
            if let Some(child) = obj.get_mut(name) {
                normalize(child, nested);
            }
        }
    }
}

/// Falsy per the legacy payload rule: absent, null, false, zero, empty
/// string, empty array, empty object.
fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}

/// Walks declared fields in order, failing on the first violation.
fn check_record(
    schema: &RecordSchema,
    obj: &Map<String, Value>,
    path_prefix: &str,
) -> RecordResult<()> {
    for (name, def) in schema.fields() {
        let path = make_path(path_prefix, name);
        match obj.get(name) {
            None | Some(Value::Null) => {
                if def.required() {
                    return Err(RecordError::validation(path, FieldViolation::Missing));
                }
            }
            Some(value) => check_value(value, def, &path)?,
        }
    }
    Ok(())
}

/// Checks one value's type and constraints, recursing into nested blocks.
fn check_value(value: &Value, def: &FieldDef, path: &str) -> RecordResult<()> {
    match def.field_type() {
        FieldType::Str => {
            if !value.is_string() {
                return Err(wrong_type(path, "string", value));
            }
        }
        FieldType::Int => {
            // Integers only; floats and numeric strings are not coerced.
            if !value.is_i64() && !value.is_u64() {
                return Err(wrong_type(path, "int", value));
            }
            check_bounds(value, def, path)?;
        }
        FieldType::Float => {
            if !value.is_number() {
                return Err(wrong_type(path, "float", value));
            }
            check_bounds(value, def, path)?;
        }
        FieldType::Date => {
            let parsed = value
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
            if parsed.is_none() {
                return Err(wrong_type(path, "date (YYYY-MM-DD)", value));
            }
        }
        FieldType::OneOf(allowed) => {
            let Some(x) = value.as_f64() else {
                return Err(wrong_type(path, "float", value));
            };
            // The allowed literals are exactly representable, so equality
            // comparison is sound here.
            if !allowed.iter().any(|a| *a == x) {
                return Err(RecordError::validation(
                    path,
                    FieldViolation::NotInAllowedSet {
                        value: x.to_string(),
                        allowed: allowed
                            .iter()
                            .map(|a| a.to_string())
                            .collect::<Vec<_>>()
                            .join(", "),
                    },
                ));
            }
        }
        FieldType::Record(nested) => {
            let Some(nested_obj) = value.as_object() else {
                return Err(wrong_type(path, "object", value));
            };
            check_record(nested, nested_obj, path)?;
        }
    }
    Ok(())
}

fn check_bounds(value: &Value, def: &FieldDef, path: &str) -> RecordResult<()> {
    let Some(x) = value.as_f64() else { return Ok(()) };
    let below = def.lower_bound().is_some_and(|lo| x < lo);
    let above = def.upper_bound().is_some_and(|hi| x > hi);
    if below || above {
        return Err(RecordError::validation(
            path,
            FieldViolation::OutOfRange {
                value: x,
                bounds: bounds_desc(def),
            },
        ));
    }
    Ok(())
}

fn bounds_desc(def: &FieldDef) -> String {
    match (def.lower_bound(), def.upper_bound()) {
        (Some(lo), Some(hi)) => format!("[{}, {}]", lo, hi),
        (Some(lo), None) => format!("[{}, +inf)", lo),
        (None, Some(hi)) => format!("(-inf, {}]", hi),
        (None, None) => "(-inf, +inf)".into(),
    }
}

fn wrong_type(path: &str, expected: &'static str, actual: &Value) -> RecordError {
    RecordError::validation(
        path,
        FieldViolation::WrongType {
            expected,
            actual: json_type_name(actual),
        },
    )
}

/// Returns the JSON type name for violation messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Creates a dot-joined field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
