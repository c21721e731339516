//! Remote store client
//!
//! Delegates upserts and ANN search over HTTP to a remote engine. The
//! wire format mirrors the [`VectorStore`] contract: documents and
//! space queries serialize as JSON. Connection and timeout failures
//! surface as [`Error::StoreUnavailable`] after exactly one retry with
//! exponential backoff; callers must not retry further.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use rankx_core::{Error, Predicate, Result, StoredDocument};

use crate::{ScoredHit, SpaceQuery, VectorStore};

const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Connection settings for a remote backend
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the remote engine, e.g. `https://search.internal:7700`
    pub url: String,
    /// Bearer credential, if the remote requires one
    pub api_key: Option<String>,
    /// Index name on the remote side
    pub index: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            index: index.into(),
            timeout: Duration::from_secs(10),
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

pub struct RemoteStore {
    config: RemoteConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct SearchBody<'a> {
    queries: &'a [SpaceQuery],
    filters: &'a [Predicate],
    limit: usize,
}

#[derive(Deserialize)]
struct SearchReply {
    hits: Vec<ScoredHit>,
}

impl RemoteStore {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(Error::InvalidConfig("remote store URL is empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("http client: {e}")))?;
        Ok(Self { config, client })
    }

    fn document_url(&self, id: &str) -> String {
        format!(
            "{}/indexes/{}/documents/{}",
            self.config.url.trim_end_matches('/'),
            self.config.index,
            id
        )
    }

    fn search_url(&self) -> String {
        format!(
            "{}/indexes/{}/search",
            self.config.url.trim_end_matches('/'),
            self.config.index
        )
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Run a request, retrying once on connect/timeout failure.
    async fn send_with_retry(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let mut backoff = RETRY_BACKOFF;
        let mut attempts_left = 1u32;

        loop {
            match self.apply_auth(build()).send().await {
                Ok(response) => return Ok(response),
                Err(err) if attempts_left > 0 && (err.is_connect() || err.is_timeout()) => {
                    warn!(error = %err, backoff_ms = backoff.as_millis() as u64, "remote store request failed, retrying");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempts_left -= 1;
                }
                Err(err) => return Err(Error::StoreUnavailable(err.to_string())),
            }
        }
    }
}

#[async_trait]
impl VectorStore for RemoteStore {
    async fn upsert(&self, doc: StoredDocument) -> Result<()> {
        let url = self.document_url(&doc.id);
        let response = self
            .send_with_retry(|| self.client.put(&url).json(&doc))
            .await?;
        if !response.status().is_success() {
            return Err(Error::StoreUnavailable(format!(
                "upsert returned HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<StoredDocument> {
        let url = self.document_url(id);
        let response = self.send_with_retry(|| self.client.get(&url)).await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::DocumentNotFound(id.to_string()));
        }
        if !response.status().is_success() {
            return Err(Error::StoreUnavailable(format!(
                "get returned HTTP {}",
                response.status()
            )));
        }
        response
            .json::<StoredDocument>()
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))
    }

    async fn search(
        &self,
        queries: &[SpaceQuery],
        filters: &[Predicate],
        limit: usize,
    ) -> Result<Vec<ScoredHit>> {
        let body = SearchBody {
            queries,
            filters,
            limit,
        };
        let url = self.search_url();
        let response = self
            .send_with_retry(|| self.client.post(&url).json(&body))
            .await?;
        if !response.status().is_success() {
            return Err(Error::StoreUnavailable(format!(
                "search returned HTTP {}",
                response.status()
            )));
        }
        let reply: SearchReply = response
            .json()
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        Ok(reply.hits)
    }

    async fn count(&self) -> Result<usize> {
        let url = format!(
            "{}/indexes/{}/stats",
            self.config.url.trim_end_matches('/'),
            self.config.index
        );
        let response = self.send_with_retry(|| self.client.get(&url)).await?;
        if !response.status().is_success() {
            return Err(Error::StoreUnavailable(format!(
                "stats returned HTTP {}",
                response.status()
            )));
        }

        #[derive(Deserialize)]
        struct Stats {
            documents: usize,
        }
        let stats: Stats = response
            .json()
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        Ok(stats.documents)
    }
}
