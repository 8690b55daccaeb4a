//! Declarative record schema definitions.
//!
//! A `RecordSchema` is a named, ordered tree of `FieldDef`s describing one
//! JSON document shape. Field order matters: fail-fast validation reports
//! the first violation in declaration order, so fields live in a `Vec`
//! rather than a map.

/// Semantic field types.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Str,
    Int,
    Float,
    /// ISO `%Y-%m-%d` date string
    Date,
    /// One of an enumerated set of float literals
    OneOf(Vec<f64>),
    /// Nested record with its own schema
    Record(RecordSchema),
}

impl FieldType {
    /// Returns the type name for violation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Str => "string",
            FieldType::Int => "int",
            FieldType::Float | FieldType::OneOf(_) => "float",
            FieldType::Date => "date",
            FieldType::Record(_) => "object",
        }
    }
}

/// Pre-validation normalization applied to a field's supplied value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalize {
    /// No transform
    #[default]
    None,
    /// Substitute an empty object when the supplied value is falsy
    /// (absent, null, false, 0, "", [], {}). Legacy payloads shipped the
    /// block under a differently-cased key; the substitution turns that
    /// into clear per-field missing errors instead of a top-level failure.
    EmptyRecordIfFalsy,
}

/// A single field's type and constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    field_type: FieldType,
    required: bool,
    /// Inclusive numeric bounds; either side may be open
    ge: Option<f64>,
    le: Option<f64>,
    normalize: Normalize,
}

impl FieldDef {
    fn with_type(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
            ge: None,
            le: None,
            normalize: Normalize::None,
        }
    }

    /// Create a required string field
    pub fn string() -> Self {
        Self::with_type(FieldType::Str)
    }

    /// Create a required integer field
    pub fn int() -> Self {
        Self::with_type(FieldType::Int)
    }

    /// Create a required float field
    pub fn float() -> Self {
        Self::with_type(FieldType::Float)
    }

    /// Create a required date field
    pub fn date() -> Self {
        Self::with_type(FieldType::Date)
    }

    /// Create a required field restricted to enumerated float literals
    pub fn one_of(values: impl IntoIterator<Item = f64>) -> Self {
        Self::with_type(FieldType::OneOf(values.into_iter().collect()))
    }

    /// Create a required nested record field
    pub fn record(schema: RecordSchema) -> Self {
        Self::with_type(FieldType::Record(schema))
    }

    /// Mark the field optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Lower inclusive bound
    pub fn ge(mut self, min: f64) -> Self {
        self.ge = Some(min);
        self
    }

    /// Upper inclusive bound
    pub fn le(mut self, max: f64) -> Self {
        self.le = Some(max);
        self
    }

    /// Substitute an empty object when the supplied value is falsy
    pub fn empty_record_if_falsy(mut self) -> Self {
        self.normalize = Normalize::EmptyRecordIfFalsy;
        self
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn lower_bound(&self) -> Option<f64> {
        self.ge
    }

    pub fn upper_bound(&self) -> Option<f64> {
        self.le
    }

    pub fn normalize(&self) -> Normalize {
        self.normalize
    }
}

/// A named, ordered tree of field definitions for one document shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    name: String,
    fields: Vec<(String, FieldDef)>,
}

impl RecordSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declare a field. Declaration order drives fail-fast reporting order.
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.push((name.into(), def));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[(String, FieldDef)] {
        &self.fields
    }
}
