//! Named query parameters
//!
//! A [`Param`] is a typed placeholder referenced from a query
//! descriptor's clauses. At compile time every param used by a plan
//! must be bound, either explicitly by the caller or by the
//! natural-language extractor.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named placeholder with an optional description (used to steer the
/// extractor) and an optional closed set of allowed values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub description: Option<String>,
    pub options: Option<Vec<String>>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            options: None,
        }
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }
}

/// Bound parameter values, keyed by param name
pub type ParamBag = HashMap<String, Value>;

/// How a param is used by the descriptor that declares it. Drives both
/// compile-time validation and the extractor's output contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamUse {
    /// Per-space weight (number)
    Weight,
    /// Similarity anchor value (text, or number for numeric spaces)
    SimilarValue,
    /// Weight of one similarity clause (number)
    SimilarWeight,
    /// Filter bound value
    FilterValue,
    /// Result count (positive integer)
    Limit,
    /// Reference document id for find-similar
    Seed,
}

/// A param together with its declared use, as exposed to the extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclaredParam {
    pub name: String,
    pub description: Option<String>,
    pub options: Option<Vec<String>>,
    pub usage: ParamUse,
}

impl DeclaredParam {
    pub fn from_param(param: &Param, usage: ParamUse) -> Self {
        Self {
            name: param.name.clone(),
            description: param.description.clone(),
            options: param.options.clone(),
            usage,
        }
    }

    /// Whether a bound value must be numeric for this use
    pub fn expects_number(&self) -> bool {
        matches!(
            self.usage,
            ParamUse::Weight | ParamUse::SimilarWeight | ParamUse::Limit
        )
    }
}
