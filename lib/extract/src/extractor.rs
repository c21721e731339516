//! Closed-vocabulary parameter extraction
//!
//! Maps free query text into the compiler's structured parameter set.
//! The reasoning model is constrained to the declared param names,
//! types and option sets; anything else it returns is dropped.
//! Explicit caller-supplied params always override extracted ones, and
//! any failure of the extraction path degrades the request instead of
//! failing it: the caller proceeds with explicit params plus the whole
//! free text as a single text anchor, and a warning in the response
//! metadata.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use rankx_query::{DeclaredParam, ParamBag, ParamUse};

use crate::client::{ExtractError, ReasoningClient};

const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of one extraction: the merged parameter bag plus degradation
/// metadata for the response.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub params: ParamBag,
    pub degraded: bool,
    pub warning: Option<String>,
}

pub struct ParamExtractor {
    client: Box<dyn ReasoningClient>,
    timeout: Duration,
}

impl ParamExtractor {
    pub fn new(client: Box<dyn ReasoningClient>) -> Self {
        Self {
            client,
            timeout: DEFAULT_EXTRACTION_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extract params from free text and merge with explicit ones.
    ///
    /// `fallback_anchor` names the param that receives the raw free
    /// text when extraction degrades (the primary text-similarity
    /// anchor of the query being served).
    pub async fn extract(
        &self,
        free_text: &str,
        declared: &[DeclaredParam],
        explicit: &ParamBag,
        fallback_anchor: Option<&str>,
    ) -> Extraction {
        let system = build_system_prompt(declared);

        let outcome = tokio::time::timeout(self.timeout, self.client.complete(&system, free_text))
            .await
            .map_err(|_| ExtractError::Timeout)
            .and_then(|r| r)
            .and_then(|raw| parse_extracted(&raw, declared));

        match outcome {
            Ok(extracted) => {
                debug!(extracted = extracted.len(), "natural-language extraction succeeded");
                let mut params = extracted;
                // Explicit overrides inferred
                for (name, value) in explicit {
                    params.insert(name.clone(), value.clone());
                }
                Extraction {
                    params,
                    degraded: false,
                    warning: None,
                }
            }
            Err(err) => {
                warn!(error = %err, "extraction degraded, proceeding with explicit params");
                let mut params = explicit.clone();
                if let Some(anchor) = fallback_anchor {
                    params
                        .entry(anchor.to_string())
                        .or_insert_with(|| Value::String(free_text.to_string()));
                }
                Extraction {
                    params,
                    degraded: true,
                    warning: Some(format!("natural-language extraction unavailable: {err}")),
                }
            }
        }
    }
}

/// Render the closed-vocabulary contract as the system prompt
fn build_system_prompt(declared: &[DeclaredParam]) -> String {
    let mut prompt = String::from(
        "You convert a product-search request into structured query parameters.\n\
         Respond with a single JSON object. Use only the following keys; omit any \
         key the request gives no information for. Never invent other keys.\n\n",
    );
    for param in declared {
        prompt.push_str(&format!("- \"{}\"", param.name));
        match param.usage {
            ParamUse::Weight | ParamUse::SimilarWeight => prompt.push_str(" (number)"),
            ParamUse::Limit => prompt.push_str(" (positive integer)"),
            ParamUse::FilterValue | ParamUse::SimilarValue | ParamUse::Seed => {}
        }
        if let Some(description) = &param.description {
            prompt.push_str(&format!(": {description}"));
        }
        if let Some(options) = &param.options {
            prompt.push_str(&format!(" Allowed values: [{}].", options.join(", ")));
        }
        prompt.push('\n');
    }
    prompt
}

/// Parse the model output and enforce the closed vocabulary: unknown
/// keys are dropped, option violations are dropped, numeric params must
/// parse as numbers.
fn parse_extracted(raw: &str, declared: &[DeclaredParam]) -> Result<ParamBag, ExtractError> {
    let value: Value =
        serde_json::from_str(raw.trim()).map_err(|e| ExtractError::Malformed(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| ExtractError::Malformed("expected a JSON object".into()))?;

    let mut bag = ParamBag::new();
    for (key, raw_value) in object {
        let Some(spec) = declared.iter().find(|p| p.name == *key) else {
            debug!(key, "dropping undeclared extraction key");
            continue;
        };
        if raw_value.is_null() {
            continue;
        }

        let value = if spec.usage == ParamUse::Limit {
            // Limits must land as positive integer JSON numbers;
            // a float or non-numeric limit is dropped, not surfaced
            match coerce_positive_integer(raw_value) {
                Some(v) => v,
                None => {
                    debug!(key, "dropping non-integer limit");
                    continue;
                }
            }
        } else if spec.expects_number() {
            match coerce_number(raw_value) {
                Some(v) => v,
                None => {
                    debug!(key, "dropping non-numeric value for numeric param");
                    continue;
                }
            }
        } else {
            raw_value.clone()
        };

        if let Some(options) = &spec.options {
            match value.as_str() {
                Some(s) if options.iter().any(|o| o == s) => {}
                _ => {
                    debug!(key, "dropping value outside declared options");
                    continue;
                }
            }
        }

        bag.insert(key.clone(), value);
    }

    Ok(bag)
}

fn coerce_positive_integer(value: &Value) -> Option<Value> {
    if let Some(n) = value.as_u64() {
        return (n > 0).then(|| Value::from(n));
    }
    let parsed = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (parsed > 0.0 && parsed.fract() == 0.0).then(|| Value::from(parsed as u64))
}

fn coerce_number(value: &Value) -> Option<Value> {
    if value.is_number() {
        return Some(value.clone());
    }
    let parsed = value.as_str()?.trim().parse::<f64>().ok()?;
    serde_json::Number::from_f64(parsed).map(Value::Number)
}
