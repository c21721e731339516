//! # rankx
//!
//! A product-search engine that ranks catalog items by combining
//! independent similarity signals - free-text semantic similarity,
//! categorical overlap, and numeric optimization (maximize rating,
//! minimize price) - into one composite relevance score, with optional
//! natural-language queries converted into structured, validated
//! search parameters.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use rankx::prelude::*;
//! use serde_json::json;
//!
//! # async fn run() -> rankx::Result<()> {
//! let service = SearchService::new(ServiceConfig::default()).await?;
//!
//! service
//!     .upsert(&json!({
//!         "id": "B001",
//!         "type": "book",
//!         "category": ["Books"],
//!         "title": "Thinking in Systems",
//!         "description": "A primer on systems thinking",
//!         "review_rating": 4.5,
//!         "review_count": 120,
//!         "price": 80.0,
//!     }))
//!     .await?;
//!
//! let response = service
//!     .search(
//!         "filter_query",
//!         SearchRequest::new()
//!             .with_param("filter_by_type", "book")
//!             .with_param("price_smaller_than", 100)
//!             .with_param("limit", 3),
//!     )
//!     .await?;
//! println!("{} hits", response.results.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate structure
//!
//! - [`rankx-core`](https://docs.rs/rankx-core) - vectors, signals, documents, filters, errors
//! - [`rankx-schema`](https://docs.rs/rankx-schema) - field descriptors, spaces, composite index
//! - [`rankx-store`](https://docs.rs/rankx-store) - embedded and remote store backends
//! - [`rankx-query`](https://docs.rs/rankx-query) - params, query builder, compiler, executor
//! - [`rankx-extract`](https://docs.rs/rankx-extract) - natural-language parameter extraction
//!
//! This crate adds the product catalog configuration, the service
//! object wiring everything together, boot-time configuration and the
//! NDJSON batch loader.

pub mod catalog;
pub mod config;
pub mod loader;
pub mod service;

// Re-export core types
pub use rankx_core::{Error, FilterOp, Predicate, Result, Signal, StoredDocument, Vector};

// Re-export the schema/space model
pub use rankx_schema::{FieldDef, FieldKind, Index, Mode, Schema, Space};

// Re-export the store abstraction
pub use rankx_store::{EmbeddedStore, RemoteConfig, RemoteStore, ScoredHit, SpaceQuery, VectorStore};

// Re-export the query layer
pub use rankx_query::{
    CompileOptions, Param, ParamBag, QueryCompiler, QueryDescriptor, QueryExecutor, QueryPlan,
    SearchResult,
};

// Re-export extraction
pub use rankx_extract::{ExtractError, Extraction, ParamExtractor, ReasoningClient, ReasoningConfig};

pub use config::{ReasoningSettings, ServiceConfig, StoreBackend};
pub use loader::{load_ndjson, LoadReport};
pub use service::{SearchRequest, SearchResponse, SearchService};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Error, FilterOp, Index, Mode, Param, ParamBag, Predicate, QueryDescriptor, Result, Schema,
        SearchRequest, SearchResponse, SearchResult, SearchService, ServiceConfig, Signal, Space,
        StoreBackend, StoredDocument, Vector, VectorStore,
    };
}
