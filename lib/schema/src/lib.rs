//! # rankx Schema
//!
//! Schema and space model for the rankx search engine.
//!
//! A [`Schema`] declares typed document fields. A [`Space`] is a pure,
//! deterministic mapping from one field's raw value to a comparable
//! signal:
//!
//! - **Text** spaces embed free text into a dense vector (cosine
//!   similarity); the embedded engine realizes the configured model
//!   identifier with a trigram/word feature-hash embedder.
//! - **Categorical** spaces emit a multi-hot vector over a fixed
//!   vocabulary with a reserved "uncategorized" slot and an optional
//!   negative filter penalty for non-matching slots.
//! - **Number** spaces normalize a value into [0, 1] with a MAXIMUM or
//!   MINIMUM directional preference.
//!
//! An [`Index`] bundles spaces and filterable fields into the contract
//! that query plans are compiled and validated against.
//!
//! ## Example
//!
//! ```rust
//! use rankx_schema::{FieldDef, FieldKind, Index, Mode, Schema, Space};
//! use serde_json::json;
//!
//! let schema = Schema::new(
//!     "product",
//!     vec![
//!         FieldDef::new("id", FieldKind::Identifier),
//!         FieldDef::new("description", FieldKind::LongText),
//!         FieldDef::new("price", FieldKind::Float),
//!     ],
//! )
//! .unwrap();
//!
//! let index = Index::new(
//!     "product_index",
//!     schema,
//!     vec![
//!         Space::text("description", "description", "example-embedding-model"),
//!         Space::number("price", "price", 0.0, 1000.0, Mode::Minimum),
//!     ],
//!     vec!["price".to_string()],
//! )
//! .unwrap();
//!
//! let doc = index
//!     .encode_document(&json!({"id": "B001", "description": "a novel", "price": 12.0}))
//!     .unwrap();
//! assert_eq!(doc.signals.len(), 2);
//! ```

pub mod embed;
pub mod field;
pub mod index;
pub mod space;

pub use embed::{embed_text, DEFAULT_TEXT_DIM};
pub use field::{as_number, as_tags, as_text, FieldDef, FieldKind, Schema};
pub use index::Index;
pub use space::{CategoricalSpace, Mode, NumberSpace, Space, TextSpace};
