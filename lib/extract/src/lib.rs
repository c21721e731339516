//! # rankx Extract
//!
//! Natural-language parameter extraction for the rankx search engine.
//!
//! [`ParamExtractor`] maps free query text into the query layer's
//! structured parameter set via an external reasoning capability,
//! constrained to the declared closed vocabulary. The call is bounded
//! by an explicit timeout; on timeout or malformed output the request
//! degrades gracefully instead of failing: explicit params are kept,
//! the whole free text becomes a single text-similarity anchor, and a
//! non-fatal warning is attached to the response metadata.

pub mod client;
pub mod extractor;

pub use client::{ExtractError, OpenAiClient, ReasoningClient, ReasoningConfig};
pub use extractor::{Extraction, ParamExtractor};
