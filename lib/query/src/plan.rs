//! Resolved, executable query plans

use std::collections::HashMap;

use serde_json::Value;

use rankx_core::{Predicate, StoredDocument};

/// A resolved similarity anchor: the raw anchor value (text or number)
/// to be encoded at execution time, and the clause weight.
#[derive(Debug, Clone)]
pub struct PlannedAnchor {
    pub space: String,
    pub value: Value,
    pub weight: f32,
}

/// Fully resolved description of one search request. Constructed per
/// request by the compiler and discarded after the response.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    /// Per-space weight; every scorable space has an entry (default 1.0)
    pub weights: HashMap<String, f32>,
    /// Similarity anchors, at most one per space
    pub anchors: Vec<PlannedAnchor>,
    /// Reference document whose stored signals seed the space queries
    /// (find-similar); resolved from the store at compile time
    pub seed: Option<StoredDocument>,
    /// Hard filter predicates over raw field values
    pub filters: Vec<Predicate>,
    pub limit: usize,
}

impl QueryPlan {
    pub fn weight_for(&self, space: &str) -> f32 {
        self.weights.get(space).copied().unwrap_or(1.0)
    }

    pub fn anchor_for(&self, space: &str) -> Option<&PlannedAnchor> {
        self.anchors.iter().find(|a| a.space == space)
    }
}
