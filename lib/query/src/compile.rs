//! Query compiler
//!
//! Turns a bag of named parameter values plus a query descriptor into a
//! validated, executable [`QueryPlan`]. All value violations are
//! collected into one [`Error::ParamValidation`] rather than failing on
//! the first, so callers see every problem at once.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use rankx_core::{Error, Predicate, Result};
use rankx_schema::Index;
use rankx_store::VectorStore;

use crate::descriptor::QueryDescriptor;
use crate::param::ParamBag;
use crate::plan::{PlannedAnchor, QueryPlan};

/// Limits applied to the `limit` param
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

pub struct QueryCompiler<'a> {
    index: &'a Index,
    options: CompileOptions,
}

impl<'a> QueryCompiler<'a> {
    pub fn new(index: &'a Index) -> Self {
        Self {
            index,
            options: CompileOptions::default(),
        }
    }

    pub fn with_options(index: &'a Index, options: CompileOptions) -> Self {
        Self { index, options }
    }

    /// Compile a descriptor and a param bag into a plan.
    ///
    /// Fails with [`Error::UnknownSpaceReference`] when the descriptor
    /// references spaces or fields the index does not declare, with
    /// [`Error::ParamValidation`] listing every bad value, and with
    /// [`Error::ReferenceDocumentNotFound`] when a seed document id
    /// does not exist in the store.
    pub async fn compile(
        &self,
        descriptor: &QueryDescriptor,
        bag: &ParamBag,
        store: &dyn VectorStore,
    ) -> Result<QueryPlan> {
        // Structural validation against the index first
        for clause in &descriptor.weights {
            self.index.require_space(&clause.space)?;
        }
        for clause in &descriptor.similars {
            self.index.require_space(&clause.space)?;
        }
        for clause in &descriptor.filters {
            self.index.require_filterable(&clause.field)?;
        }

        let mut violations: Vec<String> = Vec::new();

        // Per-space weights: every scorable space is active at 1.0
        // unless a bound weight param overrides it
        let mut weights: HashMap<String, f32> = self
            .index
            .scorable_spaces()
            .iter()
            .map(|s| (s.id().to_string(), 1.0))
            .collect();
        for clause in &descriptor.weights {
            if let Some(value) = bag.get(&clause.param.name) {
                match value.as_f64() {
                    Some(w) => {
                        weights.insert(clause.space.clone(), w as f32);
                    }
                    None => violations.push(format!(
                        "param '{}' must be a number, got {value}",
                        clause.param.name
                    )),
                }
            }
        }

        // Similarity anchors; at most one per space, later clauses win
        let mut anchors: HashMap<String, PlannedAnchor> = HashMap::new();
        for clause in &descriptor.similars {
            let Some(value) = bag.get(&clause.value.name) else {
                continue;
            };
            if !(value.is_string() || value.is_number()) {
                violations.push(format!(
                    "param '{}' must be text or a number, got {value}",
                    clause.value.name
                ));
                continue;
            }
            let weight = match bag.get(&clause.weight.name) {
                Some(w) => match w.as_f64() {
                    Some(w) => w as f32,
                    None => {
                        violations.push(format!(
                            "param '{}' must be a number, got {w}",
                            clause.weight.name
                        ));
                        continue;
                    }
                },
                None => 1.0,
            };
            anchors.insert(
                clause.space.clone(),
                PlannedAnchor {
                    space: clause.space.clone(),
                    value: value.clone(),
                    weight,
                },
            );
        }

        // Filters: unbound filter params simply drop their clause
        let mut filters: Vec<Predicate> = Vec::new();
        for clause in &descriptor.filters {
            let Some(value) = bag.get(&clause.param.name) else {
                continue;
            };
            let value = coerce_numeric_string(value);
            if let Some(options) = &clause.param.options {
                match value.as_str() {
                    Some(s) if options.iter().any(|o| o == s) => {}
                    _ => {
                        violations.push(format!(
                            "param '{}' must be one of [{}], got {value}",
                            clause.param.name,
                            options.join(", ")
                        ));
                        continue;
                    }
                }
            } else if matches!(clause.op, rankx_core::FilterOp::Gte | rankx_core::FilterOp::Lte)
                && !value.is_number()
            {
                violations.push(format!(
                    "param '{}' must be a number, got {value}",
                    clause.param.name
                ));
                continue;
            }
            filters.push(Predicate::new(clause.field.clone(), clause.op, value));
        }

        // Limit: positive integer, clamped to the configured maximum
        let limit = match descriptor.limit.as_ref().and_then(|p| bag.get(&p.name)) {
            Some(value) => match value.as_u64() {
                Some(n) if n > 0 => (n as usize).min(self.options.max_limit),
                _ => {
                    violations.push(format!("param 'limit' must be a positive integer, got {value}"));
                    self.options.default_limit
                }
            },
            None => self.options.default_limit,
        };

        if !violations.is_empty() {
            return Err(Error::ParamValidation(violations));
        }

        // Seed document resolution happens at compile time so a bad
        // reference fails before any scoring work
        let seed = match descriptor.seed.as_ref().and_then(|p| bag.get(&p.name)) {
            Some(value) => {
                let id = value.as_str().ok_or_else(|| {
                    Error::ParamValidation(vec![format!(
                        "seed param must be a document id string, got {value}"
                    )])
                })?;
                match store.get(id).await {
                    Ok(doc) => Some(doc),
                    Err(Error::DocumentNotFound(id)) => {
                        return Err(Error::ReferenceDocumentNotFound(id))
                    }
                    Err(err) => return Err(err),
                }
            }
            None => None,
        };

        debug!(
            query = %descriptor.name,
            anchors = anchors.len(),
            filters = filters.len(),
            limit,
            seeded = seed.is_some(),
            "compiled query plan"
        );

        Ok(QueryPlan {
            weights,
            anchors: anchors.into_values().collect(),
            seed,
            filters,
            limit,
        })
    }
}

/// The extractor sometimes returns numbers as strings; filter bounds
/// tolerate that.
fn coerce_numeric_string(value: &Value) -> Value {
    if let Some(s) = value.as_str() {
        if let Ok(n) = s.trim().parse::<f64>() {
            if let Some(number) = serde_json::Number::from_f64(n) {
                return Value::Number(number);
            }
        }
    }
    value.clone()
}
