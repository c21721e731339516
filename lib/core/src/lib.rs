//! # rankx Core
//!
//! Core types for the rankx search engine.
//!
//! This crate provides the fundamental data structures shared by every
//! layer of the engine:
//!
//! - [`Vector`] - Dense vector representation with cosine similarity
//! - [`Signal`] - The embedded form of a field value within a space
//!   (dense vector or normalized scalar)
//! - [`StoredDocument`] - Raw field values plus one signal per space
//! - [`Predicate`] - Hard filter clauses over raw field values
//! - [`Error`] - The shared error taxonomy
//!
//! ## Example
//!
//! ```rust
//! use rankx_core::{Signal, StoredDocument, Vector};
//! use serde_json::json;
//!
//! let doc = StoredDocument::new("B001", json!({"type": "book", "price": 80.0}))
//!     .with_signal("description", Signal::Dense(Vector::new(vec![0.2, 0.8])))
//!     .with_signal("price", Signal::Scalar(0.92));
//!
//! assert!(doc.signal("description").is_some());
//! ```

pub mod document;
pub mod error;
pub mod filter;
pub mod signal;
pub mod vector;

pub use document::StoredDocument;
pub use error::{Error, Result};
pub use filter::{matches_all, FilterOp, Predicate};
pub use signal::Signal;
pub use vector::Vector;
