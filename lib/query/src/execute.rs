//! Query executor
//!
//! Runs a compiled plan against the store: encodes anchors through the
//! space model into query signals, delegates the scored scan to the
//! store, and returns ranked results. The find-similar variant seeds
//! the space queries from an existing document's stored signals
//! instead of encoding fresh anchors.

use serde::{Deserialize, Serialize};
use tracing::debug;

use rankx_core::Result;
use rankx_schema::{Index, Space};
use rankx_store::{SpaceQuery, VectorStore};

use crate::plan::QueryPlan;

/// One ranked document: id, composite score, raw stored fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub score: f32,
    pub fields: serde_json::Value,
}

pub struct QueryExecutor<'a> {
    index: &'a Index,
    store: &'a dyn VectorStore,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(index: &'a Index, store: &'a dyn VectorStore) -> Self {
        Self { index, store }
    }

    /// Execute a compiled plan and return ranked results, ordered by
    /// score descending with ties broken by id ascending.
    pub async fn execute(&self, plan: &QueryPlan) -> Result<Vec<SearchResult>> {
        let mut queries: Vec<SpaceQuery> = Vec::new();

        for space in self.index.scorable_spaces() {
            let weight = plan.weight_for(space.id());
            if weight == 0.0 {
                continue;
            }

            if let Some(anchor) = plan.anchor_for(space.id()) {
                let signal = space.encode_anchor(&anchor.value)?;
                queries.push(SpaceQuery::anchored(
                    space.id(),
                    weight * anchor.weight,
                    signal,
                ));
            } else if let Some(seed) = &plan.seed {
                // More-like-this: reuse the reference document's signal
                if let Some(signal) = seed.signal(space.id()) {
                    queries.push(SpaceQuery::anchored(space.id(), weight, signal.clone()));
                }
            } else if matches!(space, Space::Number(_)) {
                // Numeric spaces score on their own normalized value
                // when no explicit target is supplied
                queries.push(SpaceQuery::unanchored(space.id(), weight));
            }
            // Text/categorical spaces without an anchor contribute nothing
        }

        debug!(spaces = queries.len(), limit = plan.limit, "executing plan");

        let hits = self
            .store
            .search(&queries, &plan.filters, plan.limit)
            .await?;

        Ok(hits
            .into_iter()
            .map(|hit| SearchResult {
                id: hit.id,
                score: hit.score,
                fields: hit.fields,
            })
            .collect())
    }
}
