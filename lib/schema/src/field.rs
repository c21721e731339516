//! Typed field descriptors
//!
//! A schema declares the fields a document may carry and their types.
//! Definitions are immutable, created once at startup, and validated
//! against incoming records at ingestion time.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use rankx_core::{Error, Result};

/// Declared type of a document field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Primary-key string
    Identifier,
    /// Short free text (titles, type labels)
    ShortText,
    /// Long free text (descriptions)
    LongText,
    Float,
    Integer,
    /// One or more categorical tags; accepts a string or an array of strings
    TagSet,
}

impl FieldKind {
    /// Check that a raw JSON value matches this kind
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::Identifier | FieldKind::ShortText | FieldKind::LongText => {
                value.is_string()
            }
            FieldKind::Float => value.is_number(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::TagSet => match value {
                Value::String(_) => true,
                Value::Array(items) => items.iter().all(Value::is_string),
                _ => false,
            },
        }
    }
}

/// A single declared field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The full set of declared fields for one document type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub id_field: String,
    pub fields: Vec<FieldDef>,
}

impl Schema {
    /// Create a schema; the field with [`FieldKind::Identifier`] becomes
    /// the primary key.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Result<Self> {
        let mut identifiers = fields.iter().filter(|f| f.kind == FieldKind::Identifier);
        let id_field = match (identifiers.next(), identifiers.next()) {
            (Some(field), None) => field.name.clone(),
            _ => {
                return Err(Error::InvalidConfig(
                    "schema must declare exactly one identifier field".into(),
                ))
            }
        };

        Ok(Self {
            name: name.into(),
            id_field,
            fields,
        })
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a raw record against the declared fields.
    ///
    /// The identifier must be present; any other declared field that is
    /// present must match its declared kind. Undeclared record fields
    /// are ignored.
    pub fn validate_record(&self, record: &Value) -> Result<String> {
        let id = record
            .get(&self.id_field)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::invalid_field(&self.id_field, "missing or non-string identifier")
            })?;

        for field in &self.fields {
            if let Some(value) = record.get(&field.name) {
                if !field.kind.accepts(value) {
                    return Err(Error::invalid_field(
                        &field.name,
                        format!("expected {:?}, got {value}", field.kind),
                    ));
                }
            }
        }

        Ok(id.to_string())
    }
}

/// Extract a string value, failing with [`Error::InvalidFieldValue`]
pub fn as_text<'a>(field: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::invalid_field(field, "expected a string"))
}

/// Extract a numeric value (integers widen to f64)
pub fn as_number(field: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| Error::invalid_field(field, "expected a number"))
}

/// Extract a tag set: a string becomes a singleton set
pub fn as_tags(field: &str, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    Error::invalid_field(field, "expected an array of strings")
                })
            })
            .collect(),
        _ => Err(Error::invalid_field(
            field,
            "expected a string or array of strings",
        )),
    }
}
