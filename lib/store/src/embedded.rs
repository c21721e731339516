//! Embedded in-process store
//!
//! Linear-scan backend suitable for small and medium corpora. Documents
//! live in a `RwLock<HashMap>`; an upsert replaces the whole document
//! under the write lock, so concurrent readers either see the previous
//! version or the new one, never a partial write.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use rankx_core::{matches_all, Error, Predicate, Result, StoredDocument};

use crate::{rank_hits, score_document, ScoredHit, SpaceQuery, VectorStore};

#[derive(Default)]
pub struct EmbeddedStore {
    documents: RwLock<HashMap<String, StoredDocument>>,
}

impl EmbeddedStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for EmbeddedStore {
    async fn upsert(&self, doc: StoredDocument) -> Result<()> {
        self.documents.write().insert(doc.id.clone(), doc);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<StoredDocument> {
        self.documents
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))
    }

    async fn search(
        &self,
        queries: &[SpaceQuery],
        filters: &[Predicate],
        limit: usize,
    ) -> Result<Vec<ScoredHit>> {
        let documents = self.documents.read();
        let hits: Vec<ScoredHit> = documents
            .values()
            .filter(|doc| matches_all(filters, &doc.fields))
            .map(|doc| {
                let (score, space_scores) = score_document(queries, doc);
                ScoredHit {
                    id: doc.id.clone(),
                    score,
                    space_scores,
                    fields: doc.fields.clone(),
                }
            })
            .collect();

        debug!(
            candidates = documents.len(),
            matched = hits.len(),
            limit,
            "embedded search"
        );

        Ok(rank_hits(hits, limit))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.documents.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankx_core::{FilterOp, Signal};
    use serde_json::json;

    fn doc(id: &str, price: f64, price_score: f32, doc_type: &str) -> StoredDocument {
        StoredDocument::new(id, json!({"type": doc_type, "price": price}))
            .with_signal("price", Signal::Scalar(price_score))
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let store = EmbeddedStore::new();
        store.upsert(doc("a", 10.0, 0.9, "book")).await.unwrap();
        store.upsert(doc("a", 20.0, 0.8, "book")).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let stored = store.get("a").await.unwrap();
        assert_eq!(stored.field("price"), Some(&json!(20.0)));
        assert_eq!(stored.signal("price"), Some(&Signal::Scalar(0.8)));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = EmbeddedStore::new();
        assert!(matches!(
            store.get("nope").await,
            Err(Error::DocumentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_search_ranks_by_composite_score() {
        let store = EmbeddedStore::new();
        store.upsert(doc("cheap", 10.0, 0.99, "book")).await.unwrap();
        store.upsert(doc("mid", 500.0, 0.5, "book")).await.unwrap();
        store.upsert(doc("dear", 990.0, 0.01, "book")).await.unwrap();

        let hits = store
            .search(&[SpaceQuery::unanchored("price", 1.0)], &[], 10)
            .await
            .unwrap();

        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["cheap", "mid", "dear"]);
    }

    #[tokio::test]
    async fn test_filters_are_strict_gates() {
        let store = EmbeddedStore::new();
        store.upsert(doc("a", 80.0, 0.92, "book")).await.unwrap();
        store.upsert(doc("b", 150.0, 0.85, "book")).await.unwrap();
        store.upsert(doc("c", 50.0, 0.95, "product")).await.unwrap();

        let filters = vec![
            Predicate::new("type", FilterOp::Eq, json!("book")),
            Predicate::new("price", FilterOp::Lte, json!(100)),
        ];
        let hits = store
            .search(&[SpaceQuery::unanchored("price", 1.0)], &filters, 10)
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a");
    }

    #[tokio::test]
    async fn test_limit_truncates() {
        let store = EmbeddedStore::new();
        for i in 0..10 {
            store
                .upsert(doc(&format!("d{i}"), 10.0, 0.5, "book"))
                .await
                .unwrap();
        }
        let hits = store
            .search(&[SpaceQuery::unanchored("price", 1.0)], &[], 3)
            .await
            .unwrap();
        assert_eq!(hits.len(), 3);
    }
}
