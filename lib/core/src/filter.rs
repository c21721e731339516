// Hard filter predicates evaluated against raw document fields.
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operator for a filter predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality; for tag-set fields, set membership
    Eq,
    /// Numeric greater-or-equal
    Gte,
    /// Numeric less-or-equal
    Lte,
}

/// A single filter clause: field, operator, bound value.
///
/// Predicates are boolean gates over raw field values, applied before
/// ranking. A document failing any predicate is excluded regardless of
/// its composite score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predicate {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Predicate {
    pub fn new(field: impl Into<String>, op: FilterOp, value: Value) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Whether a document's raw fields satisfy this predicate.
    ///
    /// A missing field never matches.
    pub fn matches(&self, fields: &Value) -> bool {
        let Some(actual) = fields.get(&self.field) else {
            return false;
        };

        match self.op {
            FilterOp::Eq => value_equals(actual, &self.value),
            FilterOp::Gte => match (actual.as_f64(), self.value.as_f64()) {
                (Some(a), Some(b)) => a >= b,
                _ => false,
            },
            FilterOp::Lte => match (actual.as_f64(), self.value.as_f64()) {
                (Some(a), Some(b)) => a <= b,
                _ => false,
            },
        }
    }
}

/// Equality that treats an array field as a set: the predicate value
/// matches if any element equals it. Numbers compare numerically so
/// integer and float encodings of the same value are equal.
fn value_equals(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::Array(items) => items.iter().any(|item| scalar_equals(item, expected)),
        _ => scalar_equals(actual, expected),
    }
}

fn scalar_equals(actual: &Value, expected: &Value) -> bool {
    match (actual.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => actual == expected,
    }
}

/// Whether a document passes every predicate (empty list passes)
pub fn matches_all(predicates: &[Predicate], fields: &Value) -> bool {
    predicates.iter().all(|p| p.matches(fields))
}
