use serde::{Deserialize, Serialize};

use crate::vector::Vector;

/// The embedded representation of a field value within a space.
///
/// Text and categorical spaces produce dense vectors; numeric spaces
/// produce a normalized scalar in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Signal {
    Dense(Vector),
    Scalar(f32),
}

impl Signal {
    /// Similarity of this stored signal against a query signal.
    ///
    /// Dense signals compare with cosine similarity. Scalar signals
    /// compare by closeness of the two normalized values, so an exact
    /// match scores 1.0 and opposite endpoints score 0.0.
    pub fn similarity(&self, query: &Signal) -> f32 {
        match (self, query) {
            (Signal::Dense(doc), Signal::Dense(q)) => doc.cosine_similarity(q),
            (Signal::Scalar(doc), Signal::Scalar(q)) => (1.0 - (doc - q).abs()).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Score of this signal with no query anchor.
    ///
    /// A numeric space already encodes directional preference, so its
    /// anchor-free score is the normalized scalar itself. Dense signals
    /// have no meaningful anchor-free score.
    pub fn self_score(&self) -> f32 {
        match self {
            Signal::Scalar(s) => s.clamp(0.0, 1.0),
            Signal::Dense(_) => 0.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_dense(&self) -> bool {
        matches!(self, Signal::Dense(_))
    }

    /// Get the dense vector if this is a dense signal
    pub fn as_dense(&self) -> Option<&Vector> {
        match self {
            Signal::Dense(v) => Some(v),
            Signal::Scalar(_) => None,
        }
    }
}

impl From<Vector> for Signal {
    fn from(v: Vector) -> Self {
        Signal::Dense(v)
    }
}

impl From<f32> for Signal {
    fn from(s: f32) -> Self {
        Signal::Scalar(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_similarity_is_cosine() {
        let doc = Signal::Dense(Vector::new(vec![1.0, 0.0]));
        let query = Signal::Dense(Vector::new(vec![1.0, 0.0]));
        assert!((doc.similarity(&query) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_scalar_similarity_by_closeness() {
        let doc = Signal::Scalar(0.8);
        assert!((doc.similarity(&Signal::Scalar(0.8)) - 1.0).abs() < 1e-6);
        assert!((doc.similarity(&Signal::Scalar(0.3)) - 0.5).abs() < 1e-6);
        assert!((Signal::Scalar(0.0).similarity(&Signal::Scalar(1.0))).abs() < 1e-6);
    }

    #[test]
    fn test_mixed_kinds_score_zero() {
        let doc = Signal::Dense(Vector::new(vec![1.0]));
        assert_eq!(doc.similarity(&Signal::Scalar(0.5)), 0.0);
    }

    #[test]
    fn test_self_score() {
        assert_eq!(Signal::Scalar(0.7).self_score(), 0.7);
        assert_eq!(Signal::Scalar(1.4).self_score(), 1.0);
        assert_eq!(Signal::Dense(Vector::new(vec![1.0])).self_score(), 0.0);
    }
}
