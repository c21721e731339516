//! The search service
//!
//! Explicitly constructed service object binding the schema/space
//! model, the store backend, the query descriptors and the optional
//! extraction client. Ingestion and query execution are independent
//! paths against the shared store; queries are stateless and run
//! concurrently without coordination.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use rankx_core::{Error, Result};
use rankx_extract::{OpenAiClient, ParamExtractor, ReasoningClient, ReasoningConfig};
use rankx_query::{
    CompileOptions, ParamBag, QueryCompiler, QueryDescriptor, QueryExecutor, SearchResult,
};
use rankx_schema::Index;
use rankx_store::{EmbeddedStore, RemoteConfig, RemoteStore, VectorStore};

use crate::catalog;
use crate::config::{ServiceConfig, StoreBackend};

/// One search request against a named query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Explicit named parameters; always take precedence over
    /// anything the extractor infers
    #[serde(default)]
    pub params: ParamBag,
    /// Optional free text routed through the extractor
    #[serde(default)]
    pub natural_query: Option<String>,
}

impl SearchRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_natural_query(mut self, text: impl Into<String>) -> Self {
        self.natural_query = Some(text.into());
        self
    }
}

/// Ranked results plus non-fatal degradation metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    /// Set when extraction degraded; the request still succeeded
    pub warning: Option<String>,
}

pub struct SearchService {
    config: ServiceConfig,
    index: Index,
    store: Arc<dyn VectorStore>,
    extractor: Option<ParamExtractor>,
    queries: HashMap<String, QueryDescriptor>,
}

impl SearchService {
    /// Construct the service for the product catalog. Validates the
    /// configuration and connects the selected backend; fails fast
    /// before accepting any traffic.
    pub async fn new(config: ServiceConfig) -> Result<Self> {
        config.validate()?;

        let index = catalog::product_index()?;
        let queries = catalog::query_descriptors();

        let store: Arc<dyn VectorStore> = match &config.backend {
            StoreBackend::Embedded => Arc::new(EmbeddedStore::new()),
            StoreBackend::Remote { url, api_key } => {
                let mut remote = RemoteConfig::new(url.clone(), index.name());
                if let Some(key) = api_key {
                    remote = remote.with_api_key(key.clone());
                }
                Arc::new(RemoteStore::new(remote)?)
            }
        };

        let extractor = match &config.reasoning {
            Some(settings) => {
                let mut reasoning =
                    ReasoningConfig::new(settings.api_key.clone(), settings.model.clone())
                        .with_timeout(settings.timeout);
                if let Some(endpoint) = &settings.endpoint {
                    reasoning = reasoning.with_endpoint(endpoint.clone());
                }
                let client = OpenAiClient::new(reasoning)
                    .map_err(|e| Error::InvalidConfig(e.to_string()))?;
                Some(ParamExtractor::new(Box::new(client)).with_timeout(settings.timeout))
            }
            None => None,
        };

        info!(
            index = index.name(),
            queries = queries.len(),
            natural_queries = extractor.is_some(),
            "search service ready"
        );

        Ok(Self {
            config,
            index,
            store,
            extractor,
            queries,
        })
    }

    /// Swap in a custom reasoning client (offline extraction backends,
    /// scripted clients in tests).
    #[must_use]
    pub fn with_reasoning_client(mut self, client: Box<dyn ReasoningClient>) -> Self {
        let timeout = self
            .config
            .reasoning
            .as_ref()
            .map(|r| r.timeout)
            .unwrap_or_else(|| std::time::Duration::from_secs(10));
        self.extractor = Some(ParamExtractor::new(client).with_timeout(timeout));
        self
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Real-time single-document upsert: validate and encode the raw
    /// record, then atomically replace any previous version.
    pub async fn upsert(&self, record: &Value) -> Result<String> {
        let doc = self.index.encode_document(record)?;
        let id = doc.id.clone();
        self.store.upsert(doc).await?;
        Ok(id)
    }

    pub async fn document_count(&self) -> Result<usize> {
        self.store.count().await
    }

    /// Run a named query. Free text (if any) is extracted into params
    /// first, then the bag is compiled and executed.
    #[instrument(skip(self, request), fields(query = query_name))]
    pub async fn search(&self, query_name: &str, request: SearchRequest) -> Result<SearchResponse> {
        let descriptor = self
            .queries
            .get(query_name)
            .ok_or_else(|| Error::QueryNotFound(query_name.to_string()))?;

        let mut bag = request.params;
        let mut warning = None;

        if let Some(text) = request.natural_query.as_deref() {
            match &self.extractor {
                Some(extractor) => {
                    let extraction = extractor
                        .extract(
                            text,
                            &descriptor.declared_params(),
                            &bag,
                            descriptor.primary_anchor_param(),
                        )
                        .await;
                    bag = extraction.params;
                    warning = extraction.warning;
                }
                None => {
                    // Extraction not configured: same degradation path
                    if let Some(anchor) = descriptor.primary_anchor_param() {
                        bag.entry(anchor.to_string())
                            .or_insert_with(|| Value::String(text.to_string()));
                    }
                    warning = Some(
                        "natural-language extraction is not configured; \
                         using the query text as a similarity anchor"
                            .to_string(),
                    );
                }
            }
        }

        let options = CompileOptions {
            default_limit: self.config.default_limit,
            max_limit: self.config.max_limit,
        };
        let plan = QueryCompiler::with_options(&self.index, options)
            .compile(descriptor, &bag, self.store.as_ref())
            .await?;
        let results = QueryExecutor::new(&self.index, self.store.as_ref())
            .execute(&plan)
            .await?;

        Ok(SearchResponse { results, warning })
    }

    /// Release backend connections
    pub async fn close(&self) -> Result<()> {
        self.store.close().await
    }
}
