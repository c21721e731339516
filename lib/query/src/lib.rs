//! # rankx Query
//!
//! Query layer for the rankx search engine.
//!
//! A [`QueryDescriptor`] declares the shape of one search surface:
//! weighted spaces, similarity anchors, filterable fields and the named
//! [`Param`]s that bind them. Descriptors are built once at startup
//! with an immutable, consuming builder.
//!
//! Per request, the [`QueryCompiler`] resolves a [`ParamBag`] (explicit
//! caller values, possibly merged with extracted ones) against the
//! descriptor and the target [`rankx_schema::Index`] into a validated
//! [`QueryPlan`]; the [`QueryExecutor`] then runs the plan against a
//! [`rankx_store::VectorStore`] and returns ranked [`SearchResult`]s.

pub mod compile;
pub mod descriptor;
pub mod execute;
pub mod param;
pub mod plan;

pub use compile::{CompileOptions, QueryCompiler};
pub use descriptor::{FilterClause, QueryBuilder, QueryDescriptor, SimilarClause, WeightClause};
pub use execute::{QueryExecutor, SearchResult};
pub use param::{DeclaredParam, Param, ParamBag, ParamUse};
pub use plan::{PlannedAnchor, QueryPlan};
