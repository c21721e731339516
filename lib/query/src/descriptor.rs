//! Query descriptors and the immutable builder
//!
//! A descriptor is the declarative shape of one search surface: which
//! spaces are weighted, which similarity anchors exist, which fields
//! can be filtered, and the params that bind them. Descriptors are
//! built once at startup with a consuming builder and never mutated
//! per request.

use rankx_core::FilterOp;

use crate::param::{DeclaredParam, Param, ParamUse};

#[derive(Debug, Clone)]
pub struct WeightClause {
    pub space: String,
    pub param: Param,
}

#[derive(Debug, Clone)]
pub struct SimilarClause {
    pub space: String,
    pub value: Param,
    pub weight: Param,
}

#[derive(Debug, Clone)]
pub struct FilterClause {
    pub field: String,
    pub op: FilterOp,
    pub param: Param,
}

/// The declarative shape of one named query
#[derive(Debug, Clone)]
pub struct QueryDescriptor {
    pub name: String,
    pub weights: Vec<WeightClause>,
    pub similars: Vec<SimilarClause>,
    pub filters: Vec<FilterClause>,
    pub limit: Option<Param>,
    pub natural: Option<Param>,
    pub seed: Option<Param>,
}

impl QueryDescriptor {
    /// Start building a new descriptor
    pub fn build(name: impl Into<String>) -> QueryBuilder {
        QueryBuilder {
            descriptor: QueryDescriptor {
                name: name.into(),
                weights: Vec::new(),
                similars: Vec::new(),
                filters: Vec::new(),
                limit: None,
                natural: None,
                seed: None,
            },
        }
    }

    /// Derive a new descriptor from this one (the base-query pattern:
    /// shared weights and filters, specialized similarity clauses).
    pub fn extend(&self, name: impl Into<String>) -> QueryBuilder {
        let mut descriptor = self.clone();
        descriptor.name = name.into();
        QueryBuilder { descriptor }
    }

    /// Every param this descriptor can bind, with its declared use.
    /// This is the closed vocabulary handed to the extractor.
    pub fn declared_params(&self) -> Vec<DeclaredParam> {
        let mut declared = Vec::new();
        for clause in &self.weights {
            declared.push(DeclaredParam::from_param(&clause.param, ParamUse::Weight));
        }
        for clause in &self.similars {
            declared.push(DeclaredParam::from_param(&clause.value, ParamUse::SimilarValue));
            declared.push(DeclaredParam::from_param(&clause.weight, ParamUse::SimilarWeight));
        }
        for clause in &self.filters {
            declared.push(DeclaredParam::from_param(&clause.param, ParamUse::FilterValue));
        }
        if let Some(limit) = &self.limit {
            declared.push(DeclaredParam::from_param(limit, ParamUse::Limit));
        }
        if let Some(seed) = &self.seed {
            declared.push(DeclaredParam::from_param(seed, ParamUse::Seed));
        }
        declared
    }

    /// Name of the first similarity-anchor param, used as the fallback
    /// target when extraction degrades and the whole query text becomes
    /// a single text anchor.
    pub fn primary_anchor_param(&self) -> Option<&str> {
        self.similars.first().map(|c| c.value.name.as_str())
    }
}

/// Consuming builder that accumulates validated clauses and produces
/// one finalized [`QueryDescriptor`] value.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    descriptor: QueryDescriptor,
}

impl QueryBuilder {
    /// Bind a space's weight to a param
    #[must_use]
    pub fn weight(mut self, space: impl Into<String>, param: Param) -> Self {
        self.descriptor.weights.push(WeightClause {
            space: space.into(),
            param,
        });
        self
    }

    /// Add a similarity anchor against a space
    #[must_use]
    pub fn similar(mut self, space: impl Into<String>, value: Param, weight: Param) -> Self {
        self.descriptor.similars.push(SimilarClause {
            space: space.into(),
            value,
            weight,
        });
        self
    }

    /// Add a hard filter clause
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, op: FilterOp, param: Param) -> Self {
        self.descriptor.filters.push(FilterClause {
            field: field.into(),
            op,
            param,
        });
        self
    }

    #[must_use]
    pub fn limit(mut self, param: Param) -> Self {
        self.descriptor.limit = Some(param);
        self
    }

    /// Declare the free-text param routed through the extractor
    #[must_use]
    pub fn natural_query(mut self, param: Param) -> Self {
        self.descriptor.natural = Some(param);
        self
    }

    /// Declare the reference-document param for find-similar queries
    #[must_use]
    pub fn seed(mut self, param: Param) -> Self {
        self.descriptor.seed = Some(param);
        self
    }

    #[must_use]
    pub fn finish(self) -> QueryDescriptor {
        self.descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates_clauses() {
        let base = QueryDescriptor::build("base")
            .weight("description", Param::new("description_weight"))
            .filter(
                "type",
                FilterOp::Eq,
                Param::new("filter_by_type").with_options(vec!["product".into(), "book".into()]),
            )
            .limit(Param::new("limit"))
            .finish();

        assert_eq!(base.weights.len(), 1);
        assert_eq!(base.filters.len(), 1);
        assert!(base.limit.is_some());
    }

    #[test]
    fn test_extend_keeps_base_clauses() {
        let base = QueryDescriptor::build("base")
            .weight("description", Param::new("description_weight"))
            .finish();

        let derived = base
            .extend("filter_query")
            .similar(
                "description",
                Param::new("query_description"),
                Param::new("description_similar_clause_weight"),
            )
            .finish();

        assert_eq!(derived.name, "filter_query");
        assert_eq!(derived.weights.len(), 1);
        assert_eq!(derived.similars.len(), 1);
        assert_eq!(base.similars.len(), 0, "base must stay unchanged");
    }

    #[test]
    fn test_declared_params_cover_all_clauses() {
        let descriptor = QueryDescriptor::build("q")
            .weight("description", Param::new("description_weight"))
            .similar(
                "description",
                Param::new("query_description"),
                Param::new("clause_weight"),
            )
            .filter("price", FilterOp::Lte, Param::new("price_smaller_than"))
            .limit(Param::new("limit"))
            .finish();

        let names: Vec<String> = descriptor
            .declared_params()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "description_weight",
                "query_description",
                "clause_weight",
                "price_smaller_than",
                "limit"
            ]
        );
        assert_eq!(descriptor.primary_anchor_param(), Some("query_description"));
    }
}
