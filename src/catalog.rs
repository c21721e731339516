//! The product catalog: schema, spaces, index and query descriptors
//!
//! This is the concrete search surface the service exposes. Documents
//! are catalog items (books and general products); three named queries
//! share one composite index:
//!
//! - `filter_query` - one description anchor plus hard filters on
//!   type, category, rating and price
//! - `semantic_query` - multiple weighted anchors (description, title,
//!   target price, target rating) plus type/category filters
//! - `similar_items_query` - seeds every space from an existing item
//!   ("more like this") under the same filter contract

use std::collections::HashMap;

use rankx_core::{FilterOp, Result};
use rankx_query::{Param, QueryDescriptor};
use rankx_schema::{FieldDef, FieldKind, Index, Mode, Schema, Space};

/// Embedding model identifier for the text spaces
pub const TEXT_MODEL: &str = "Alibaba-NLP/gte-large-en-v1.5";

pub const TYPES: [&str; 2] = ["product", "book"];

/// Fixed, ordered category vocabulary; values outside it land in the
/// reserved uncategorized slot
pub const CATEGORIES: [&str; 10] = [
    "Books",
    "Electronics",
    "Home & Kitchen",
    "Clothing, Shoes & Jewelry",
    "Sports & Outdoors",
    "Toys & Games",
    "Health & Personal Care",
    "Beauty & Personal Care",
    "Office Products",
    "Grocery & Gourmet Food",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn product_schema() -> Result<Schema> {
    Schema::new(
        "product",
        vec![
            FieldDef::new("id", FieldKind::Identifier),
            FieldDef::new("type", FieldKind::ShortText),
            FieldDef::new("category", FieldKind::TagSet),
            FieldDef::new("title", FieldKind::ShortText),
            FieldDef::new("description", FieldKind::LongText),
            FieldDef::new("review_rating", FieldKind::Float),
            FieldDef::new("review_count", FieldKind::Integer),
            FieldDef::new("price", FieldKind::Float),
        ],
    )
}

/// The composite product index: five scored spaces plus the filterable
/// fields used by the hard predicates.
pub fn product_index() -> Result<Index> {
    Index::new(
        "product_index",
        product_schema()?,
        vec![
            Space::categorical("category", "category", owned(&CATEGORIES))
                .with_uncategorized_as_category(true)
                .with_negative_filter(-1.0),
            Space::text("title", "title", TEXT_MODEL),
            Space::text("description", "description", TEXT_MODEL),
            Space::number("review_rating_maximizer", "review_rating", 1.0, 5.0, Mode::Maximum),
            Space::number("price_minimizer", "price", 0.0, 1000.0, Mode::Minimum),
        ],
        vec![
            "type".to_string(),
            "category".to_string(),
            "review_rating".to_string(),
            "price".to_string(),
        ],
    )
}

/// Shared base: per-space weights, limit, natural-language routing and
/// the type filter. The named queries derive from it.
fn base_query() -> QueryDescriptor {
    QueryDescriptor::build("base_query")
        .weight("category", Param::new("category_weight"))
        .weight("title", Param::new("title_weight"))
        .weight("description", Param::new("description_weight"))
        .weight(
            "review_rating_maximizer",
            Param::new("review_rating_maximizer_weight"),
        )
        .weight("price_minimizer", Param::new("price_minimizer_weight"))
        .limit(Param::new("limit"))
        .natural_query(Param::new("natural_query"))
        .filter(
            "type",
            FilterOp::Eq,
            Param::new("filter_by_type")
                .describe("Used to only present items that have a specific type")
                .with_options(owned(&TYPES)),
        )
        .finish()
}

fn query_description_param() -> Param {
    Param::new("query_description").describe(
        "The text in the user's query that is used to search in the products' description. \
         Extract info that does not apply to other spaces or params.",
    )
}

pub fn filter_query() -> QueryDescriptor {
    base_query()
        .extend("filter_query")
        .similar(
            "description",
            query_description_param(),
            Param::new("description_similar_clause_weight"),
        )
        .filter(
            "category",
            FilterOp::Eq,
            Param::new("filter_by_category")
                .describe("Used to only present items that belong to a specific category")
                .with_options(owned(&CATEGORIES)),
        )
        .filter(
            "review_rating",
            FilterOp::Gte,
            Param::new("rating_bigger_than")
                .describe("Used to find items with a rating bigger than the provided number."),
        )
        .filter(
            "price",
            FilterOp::Lte,
            Param::new("price_smaller_than")
                .describe("Used to find items with a price smaller than the provided number."),
        )
        .finish()
}

pub fn semantic_query() -> QueryDescriptor {
    base_query()
        .extend("semantic_query")
        .similar(
            "description",
            query_description_param(),
            Param::new("description_similar_clause_weight"),
        )
        .similar(
            "title",
            Param::new("query_title").describe(
                "The text in the user's query that is used to search in the products' title. \
                 Extract info that does not apply to other spaces or params.",
            ),
            Param::new("title_similar_clause_weight"),
        )
        .similar(
            "price_minimizer",
            Param::new("query_price").describe(
                "The target price in the user's query, used to prefer items priced near it.",
            ),
            Param::new("price_similar_clause_weight"),
        )
        .similar(
            "review_rating_maximizer",
            Param::new("query_review_rating").describe(
                "The target review rating in the user's query, used to prefer items rated near it.",
            ),
            Param::new("review_rating_similar_clause_weight"),
        )
        .filter(
            "category",
            FilterOp::Eq,
            Param::new("filter_by_category")
                .describe("Used to only present items that belong to a specific category")
                .with_options(owned(&CATEGORIES)),
        )
        .finish()
}

pub fn similar_items_query() -> QueryDescriptor {
    filter_query()
        .extend("similar_items_query")
        .seed(Param::new("product_id").describe("Id of an existing item to find similar items for"))
        .finish()
}

/// All named queries the service serves, keyed by name
pub fn query_descriptors() -> HashMap<String, QueryDescriptor> {
    [filter_query(), semantic_query(), similar_items_query()]
        .into_iter()
        .map(|q| (q.name.clone(), q))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_builds() {
        let index = product_index().unwrap();
        assert_eq!(index.scorable_spaces().len(), 5);
        assert_eq!(index.filterable_fields().len(), 4);
    }

    #[test]
    fn test_descriptors_reference_declared_spaces() {
        let index = product_index().unwrap();
        for descriptor in query_descriptors().values() {
            for clause in &descriptor.weights {
                assert!(index.space(&clause.space).is_some(), "{}", clause.space);
            }
            for clause in &descriptor.similars {
                assert!(index.space(&clause.space).is_some(), "{}", clause.space);
            }
            for clause in &descriptor.filters {
                assert!(index.require_filterable(&clause.field).is_ok(), "{}", clause.field);
            }
        }
    }

    #[test]
    fn test_similar_items_query_has_seed_and_filters() {
        let descriptor = similar_items_query();
        assert!(descriptor.seed.is_some());
        assert_eq!(descriptor.filters.len(), 4);
        assert_eq!(descriptor.primary_anchor_param(), Some("query_description"));
    }
}
