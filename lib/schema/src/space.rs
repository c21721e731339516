//! Spaces: deterministic mappings from field values to signals
//!
//! Each space embeds one document field into a comparable signal. Text
//! spaces produce dense embeddings compared by cosine similarity,
//! categorical spaces produce multi-hot vectors over a fixed category
//! vocabulary, and numeric spaces produce a normalized scalar encoding
//! a directional preference (maximize or minimize).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use rankx_core::{Error, Result, Signal, Vector};

use crate::embed::{embed_text, DEFAULT_TEXT_DIM};
use crate::field::{as_number, as_tags, as_text};

/// Directional preference of a numeric space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Higher raw values score higher
    Maximum,
    /// Lower raw values score higher
    Minimum,
}

/// Free-text similarity space backed by a text-embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSpace {
    pub id: String,
    pub field: String,
    /// Embedding model identifier; part of the embedding seed, so spaces
    /// with different models are not comparable
    pub model: String,
    pub dim: usize,
}

/// Categorical space: multi-hot over a fixed, ordered vocabulary plus a
/// reserved "uncategorized" slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalSpace {
    pub id: String,
    pub field: String,
    pub categories: Vec<String>,
    /// Map unknown values to the reserved slot instead of rejecting them
    pub uncategorized_as_category: bool,
    /// Value written into non-matching slots of document encodings, so
    /// absence is distinguishable from irrelevance. 0.0 is neutral;
    /// negative values penalize mismatches.
    pub negative_filter: f32,
}

/// Numeric space: normalized scalar over [min_value, max_value]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberSpace {
    pub id: String,
    pub field: String,
    pub min_value: f64,
    pub max_value: f64,
    pub mode: Mode,
}

/// A space definition, immutable after construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Space {
    Text(TextSpace),
    Categorical(CategoricalSpace),
    Number(NumberSpace),
}

impl Space {
    pub fn text(
        id: impl Into<String>,
        field: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Space::Text(TextSpace {
            id: id.into(),
            field: field.into(),
            model: model.into(),
            dim: DEFAULT_TEXT_DIM,
        })
    }

    pub fn categorical(
        id: impl Into<String>,
        field: impl Into<String>,
        categories: Vec<String>,
    ) -> Self {
        Space::Categorical(CategoricalSpace {
            id: id.into(),
            field: field.into(),
            categories,
            uncategorized_as_category: true,
            negative_filter: 0.0,
        })
    }

    pub fn number(
        id: impl Into<String>,
        field: impl Into<String>,
        min_value: f64,
        max_value: f64,
        mode: Mode,
    ) -> Self {
        Space::Number(NumberSpace {
            id: id.into(),
            field: field.into(),
            min_value,
            max_value,
            mode,
        })
    }

    #[must_use]
    pub fn with_negative_filter(mut self, negative_filter: f32) -> Self {
        if let Space::Categorical(ref mut c) = self {
            c.negative_filter = negative_filter;
        }
        self
    }

    #[must_use]
    pub fn with_uncategorized_as_category(mut self, enabled: bool) -> Self {
        if let Space::Categorical(ref mut c) = self {
            c.uncategorized_as_category = enabled;
        }
        self
    }

    pub fn id(&self) -> &str {
        match self {
            Space::Text(s) => &s.id,
            Space::Categorical(s) => &s.id,
            Space::Number(s) => &s.id,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Space::Text(s) => &s.field,
            Space::Categorical(s) => &s.field,
            Space::Number(s) => &s.field,
        }
    }

    /// Encode a document-side field value into this space's signal.
    ///
    /// Pure and deterministic: the same value always yields the same
    /// signal. Fails with [`Error::InvalidFieldValue`] on type mismatch
    /// or an unmappable category.
    pub fn encode(&self, value: &Value) -> Result<Signal> {
        match self {
            Space::Text(s) => {
                let text = as_text(&s.field, value)?;
                Ok(Signal::Dense(embed_text(text, &s.model, s.dim)))
            }
            Space::Categorical(s) => {
                let tags = as_tags(&s.field, value)?;
                s.encode_tags(&tags, s.negative_filter).map(Signal::Dense)
            }
            Space::Number(s) => {
                let raw = as_number(&s.field, value)?;
                Ok(Signal::Scalar(s.normalize(raw)))
            }
        }
    }

    /// Encode a query-side anchor value.
    ///
    /// Query encodings never apply the categorical negative filter, and
    /// numeric anchors accept numbers or numeric strings (the extractor
    /// returns strings for some params).
    pub fn encode_anchor(&self, value: &Value) -> Result<Signal> {
        match self {
            Space::Text(s) => {
                let text = as_text(&s.field, value)?;
                Ok(Signal::Dense(embed_text(text, &s.model, s.dim)))
            }
            Space::Categorical(s) => {
                let tags = as_tags(&s.field, value)?;
                s.encode_tags(&tags, 0.0).map(Signal::Dense)
            }
            Space::Number(s) => {
                let raw = match value {
                    Value::String(text) => text.trim().parse::<f64>().map_err(|_| {
                        Error::invalid_field(&s.field, "anchor is not numeric")
                    })?,
                    _ => as_number(&s.field, value)?,
                };
                Ok(Signal::Scalar(s.normalize(raw)))
            }
        }
    }
}

impl CategoricalSpace {
    /// Number of slots: one per category plus the reserved slot
    pub fn dim(&self) -> usize {
        self.categories.len() + 1
    }

    fn encode_tags(&self, tags: &[String], negative: f32) -> Result<Vector> {
        let mut slots = vec![negative; self.dim()];
        let uncategorized_slot = self.categories.len();

        for tag in tags {
            match self.categories.iter().position(|c| c == tag) {
                Some(i) => slots[i] = 1.0,
                None if self.uncategorized_as_category => slots[uncategorized_slot] = 1.0,
                None => {
                    return Err(Error::invalid_field(
                        &self.field,
                        format!("unknown category '{tag}'"),
                    ))
                }
            }
        }

        Ok(Vector::new(slots))
    }
}

impl NumberSpace {
    /// Normalize a raw value into [0, 1] according to the mode.
    ///
    /// Out-of-bounds values clamp to the endpoints.
    pub fn normalize(&self, raw: f64) -> f32 {
        let span = self.max_value - self.min_value;
        if span <= 0.0 {
            return 0.0;
        }
        let scaled = ((raw - self.min_value) / span).clamp(0.0, 1.0) as f32;
        match self.mode {
            Mode::Maximum => scaled,
            Mode::Minimum => 1.0 - scaled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_encode_deterministic() {
        let space = Space::text("description", "description", "test-model");
        let a = space.encode(&json!("a study of memory")).unwrap();
        let b = space.encode(&json!("a study of memory")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_text_encode_rejects_non_string() {
        let space = Space::text("description", "description", "test-model");
        assert!(space.encode(&json!(42)).is_err());
    }

    #[test]
    fn test_number_maximum_monotonic_and_bounded() {
        let space = NumberSpace {
            id: "rating".into(),
            field: "review_rating".into(),
            min_value: 1.0,
            max_value: 5.0,
            mode: Mode::Maximum,
        };
        let mut prev = -1.0f32;
        for raw in [0.0, 1.0, 2.5, 4.0, 5.0, 9.0] {
            let score = space.normalize(raw);
            assert!((0.0..=1.0).contains(&score));
            assert!(score >= prev, "score must not decrease as value grows");
            prev = score;
        }
    }

    #[test]
    fn test_number_minimum_monotonic() {
        let space = NumberSpace {
            id: "price".into(),
            field: "price".into(),
            min_value: 0.0,
            max_value: 1000.0,
            mode: Mode::Minimum,
        };
        let mut prev = 2.0f32;
        for raw in [-10.0, 0.0, 100.0, 500.0, 1000.0, 2000.0] {
            let score = space.normalize(raw);
            assert!((0.0..=1.0).contains(&score));
            assert!(score <= prev, "score must not increase as value grows");
            prev = score;
        }
        assert_eq!(space.normalize(0.0), 1.0);
        assert_eq!(space.normalize(1000.0), 0.0);
    }

    #[test]
    fn test_categorical_negative_filter_penalizes_mismatch() {
        let space = Space::categorical(
            "category",
            "category",
            vec!["Books".into(), "Electronics".into()],
        )
        .with_negative_filter(-1.0);

        let books = space.encode(&json!(["Books"])).unwrap();
        let query = space.encode_anchor(&json!("Books")).unwrap();
        let electronics = space.encode(&json!(["Electronics"])).unwrap();

        let hit = books.similarity(&query);
        let miss = electronics.similarity(&query);
        assert!(hit > 0.0);
        assert!(miss < 0.0, "mismatched category should score negative");
    }

    #[test]
    fn test_categorical_unknown_maps_to_reserved_slot() {
        let space = Space::categorical("category", "category", vec!["Books".into()]);
        let sig = space.encode(&json!("Gardening")).unwrap();
        let dense = sig.as_dense().unwrap();
        // Reserved slot is the last one
        assert_eq!(dense.as_slice()[1], 1.0);
        assert_eq!(dense.as_slice()[0], 0.0);
    }

    #[test]
    fn test_categorical_unknown_rejected_when_disabled() {
        let space = Space::categorical("category", "category", vec!["Books".into()])
            .with_uncategorized_as_category(false);
        assert!(space.encode(&json!("Gardening")).is_err());
    }

    #[test]
    fn test_number_anchor_parses_strings() {
        let space = Space::number("price", "price", 0.0, 1000.0, Mode::Minimum);
        let from_str = space.encode_anchor(&json!("250")).unwrap();
        let from_num = space.encode_anchor(&json!(250.0)).unwrap();
        assert_eq!(from_str, from_num);
    }
}
