//! Boot-time service configuration
//!
//! Backend and reasoning-capability selection happen once, at
//! construction. Missing credentials are startup-fatal: the service
//! refuses to build rather than partially start.

use std::env;
use std::time::Duration;

use rankx_core::{Error, Result};

/// Which store backend to run against
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// In-process store, no external dependencies
    Embedded,
    /// Remote engine over HTTP
    Remote { url: String, api_key: Option<String> },
}

/// Reasoning-capability settings; required only when natural-language
/// queries are used
#[derive(Debug, Clone)]
pub struct ReasoningSettings {
    pub endpoint: Option<String>,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl ReasoningSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: None,
            api_key: api_key.into(),
            model: "gpt-4o".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub backend: StoreBackend,
    /// `None` disables natural-language queries; requests carrying
    /// `natural_query` then degrade to the raw-text anchor
    pub reasoning: Option<ReasoningSettings>,
    pub default_limit: usize,
    pub max_limit: usize,
    /// Batch ingestion buffer size; bounds peak loader memory
    pub chunk_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Embedded,
            reasoning: None,
            default_limit: 10,
            max_limit: 100,
            chunk_size: 100,
        }
    }
}

impl ServiceConfig {
    /// Build from environment variables.
    ///
    /// `RANKX_REMOTE_URL` (+ optional `RANKX_REMOTE_API_KEY`) selects
    /// the remote backend; `OPENAI_API_KEY` (+ optional
    /// `OPENAI_MODEL_ID`) enables natural-language queries.
    pub fn from_env() -> Self {
        let backend = match env::var("RANKX_REMOTE_URL") {
            Ok(url) => StoreBackend::Remote {
                url,
                api_key: env::var("RANKX_REMOTE_API_KEY").ok(),
            },
            Err(_) => StoreBackend::Embedded,
        };

        let reasoning = env::var("OPENAI_API_KEY").ok().map(|api_key| {
            let mut settings = ReasoningSettings::new(api_key);
            if let Ok(model) = env::var("OPENAI_MODEL_ID") {
                settings.model = model;
            }
            settings
        });

        Self {
            backend,
            reasoning,
            ..Self::default()
        }
    }

    /// Fail fast on configurations that must never reach traffic
    pub fn validate(&self) -> Result<()> {
        if let StoreBackend::Remote { url, .. } = &self.backend {
            if url.trim().is_empty() {
                return Err(Error::InvalidConfig("remote backend URL is empty".into()));
            }
        }
        if let Some(reasoning) = &self.reasoning {
            if reasoning.api_key.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "reasoning API key must be set to use natural language queries".into(),
                ));
            }
            if reasoning.model.trim().is_empty() {
                return Err(Error::InvalidConfig("reasoning model id is empty".into()));
            }
        }
        if self.default_limit == 0 || self.max_limit == 0 || self.chunk_size == 0 {
            return Err(Error::InvalidConfig(
                "limits and chunk size must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ServiceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_remote_url_is_fatal() {
        let config = ServiceConfig {
            backend: StoreBackend::Remote {
                url: "  ".into(),
                api_key: None,
            },
            ..ServiceConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_blank_reasoning_key_is_fatal() {
        let config = ServiceConfig {
            reasoning: Some(ReasoningSettings::new("")),
            ..ServiceConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
