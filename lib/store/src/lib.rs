//! # rankx Store
//!
//! Document/vector store abstraction for the rankx search engine.
//!
//! Holds per-document per-space signals behind a uniform
//! insert/upsert/query contract. Two interchangeable backends:
//!
//! - [`EmbeddedStore`] - in-process linear-scan store for small and
//!   medium corpora
//! - [`RemoteStore`] - delegates search over HTTP to a remote engine,
//!   with one bounded retry before surfacing
//!   [`rankx_core::Error::StoreUnavailable`]
//!
//! Backend choice is a boot-time decision, invisible to callers, which
//! only see `Arc<dyn VectorStore>`.

pub mod embedded;
pub mod remote;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rankx_core::{Predicate, Result, Signal, StoredDocument};

pub use embedded::EmbeddedStore;
pub use remote::{RemoteConfig, RemoteStore};

/// One space's contribution to a search: the query signal (if any) and
/// the weight applied to that space's similarity.
///
/// A `None` signal means the space scores documents on their own stored
/// signal (numeric spaces with no explicit anchor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceQuery {
    pub space: String,
    pub weight: f32,
    pub signal: Option<Signal>,
}

impl SpaceQuery {
    pub fn anchored(space: impl Into<String>, weight: f32, signal: Signal) -> Self {
        Self {
            space: space.into(),
            weight,
            signal: Some(signal),
        }
    }

    pub fn unanchored(space: impl Into<String>, weight: f32) -> Self {
        Self {
            space: space.into(),
            weight,
            signal: None,
        }
    }
}

/// A ranked search hit with its composite score and per-space breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredHit {
    pub id: String,
    pub score: f32,
    pub space_scores: HashMap<String, f32>,
    pub fields: serde_json::Value,
}

/// Uniform contract over the embedded and remote backends.
///
/// `upsert` atomically replaces all signals for an id; readers never
/// observe a half-written document. `search` merges per-space scores
/// into one composite score per document, applies filters as hard
/// gates, and returns hits ordered by score descending with ties broken
/// by id ascending.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn upsert(&self, doc: StoredDocument) -> Result<()>;

    /// Fetch a document by id, failing with
    /// [`rankx_core::Error::DocumentNotFound`] if absent
    async fn get(&self, id: &str) -> Result<StoredDocument>;

    async fn search(
        &self,
        queries: &[SpaceQuery],
        filters: &[Predicate],
        limit: usize,
    ) -> Result<Vec<ScoredHit>>;

    async fn count(&self) -> Result<usize>;

    /// Release any backend connections. Default is a no-op.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Composite score of one document under a set of space queries.
///
/// Returns the weighted sum and the per-space weighted contributions.
/// Spaces with zero weight are skipped entirely.
pub fn score_document(
    queries: &[SpaceQuery],
    doc: &StoredDocument,
) -> (f32, HashMap<String, f32>) {
    let mut total = 0.0f32;
    let mut space_scores = HashMap::new();

    for query in queries {
        if query.weight == 0.0 {
            continue;
        }
        let Some(stored) = doc.signal(&query.space) else {
            continue;
        };
        let similarity = match &query.signal {
            Some(anchor) => stored.similarity(anchor),
            None => stored.self_score(),
        };
        let contribution = query.weight * similarity;
        total += contribution;
        space_scores.insert(query.space.clone(), contribution);
    }

    (total, space_scores)
}

/// Order hits by score descending, ties by id ascending, and truncate
pub fn rank_hits(mut hits: Vec<ScoredHit>, limit: usize) -> Vec<ScoredHit> {
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    hits.truncate(limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankx_core::Vector;
    use serde_json::json;

    #[test]
    fn test_score_document_weighted_sum() {
        let doc = StoredDocument::new("a", json!({}))
            .with_signal("text", Signal::Dense(Vector::new(vec![1.0, 0.0])))
            .with_signal("price", Signal::Scalar(0.5));

        let queries = vec![
            SpaceQuery::anchored("text", 2.0, Signal::Dense(Vector::new(vec![1.0, 0.0]))),
            SpaceQuery::unanchored("price", 1.0),
        ];

        let (total, parts) = score_document(&queries, &doc);
        assert!((total - 2.5).abs() < 1e-6);
        assert!((parts["text"] - 2.0).abs() < 1e-6);
        assert!((parts["price"] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_weight_disables_space() {
        let doc = StoredDocument::new("a", json!({})).with_signal("price", Signal::Scalar(1.0));
        let (total, parts) = score_document(&[SpaceQuery::unanchored("price", 0.0)], &doc);
        assert_eq!(total, 0.0);
        assert!(parts.is_empty());
    }

    #[test]
    fn test_rank_hits_ties_break_by_id() {
        let hits = vec![
            ScoredHit {
                id: "b".into(),
                score: 1.0,
                space_scores: HashMap::new(),
                fields: json!({}),
            },
            ScoredHit {
                id: "a".into(),
                score: 1.0,
                space_scores: HashMap::new(),
                fields: json!({}),
            },
            ScoredHit {
                id: "c".into(),
                score: 2.0,
                space_scores: HashMap::new(),
                fields: json!({}),
            },
        ];
        let ranked = rank_hits(hits, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id, "c");
        assert_eq!(ranked[1].id, "a");
    }
}
