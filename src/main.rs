//! rankx CLI: ingest a catalog file and run one of the named queries

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rankx::{load_ndjson, SearchRequest, SearchService, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "rankx", version, about = "Multi-space product search engine")]
struct Args {
    /// NDJSON catalog file to ingest before querying
    #[arg(long)]
    data: Option<PathBuf>,

    /// Named query to run: filter_query, semantic_query or similar_items_query
    #[arg(long, default_value = "filter_query")]
    query: String,

    /// Free-text query routed through natural-language extraction
    #[arg(long)]
    natural: Option<String>,

    /// Explicit params as name=value pairs (value parsed as JSON,
    /// falling back to a plain string), e.g. --param filter_by_type=book
    #[arg(long = "param")]
    params: Vec<String>,

    /// Result limit
    #[arg(long)]
    limit: Option<usize>,
}

fn parse_param(raw: &str) -> anyhow::Result<(String, Value)> {
    let Some((name, value)) = raw.split_once('=') else {
        bail!("param '{raw}' must have the form name=value");
    };
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config = ServiceConfig::from_env();
    let service = SearchService::new(config)
        .await
        .context("failed to start search service")?;

    if let Some(path) = &args.data {
        let report = load_ndjson(&service, path, service.config().chunk_size).await?;
        info!(loaded = report.loaded, rejected = report.rejected, "ingestion complete");
    }

    let mut request = SearchRequest::new();
    for raw in &args.params {
        let (name, value) = parse_param(raw)?;
        request.params.insert(name, value);
    }
    if let Some(limit) = args.limit {
        request.params.insert("limit".to_string(), limit.into());
    }
    if let Some(natural) = &args.natural {
        request = request.with_natural_query(natural.clone());
    }

    let response = service.search(&args.query, request).await?;
    if let Some(warning) = &response.warning {
        eprintln!("warning: {warning}");
    }
    for result in &response.results {
        println!(
            "{}",
            serde_json::to_string(&serde_json::json!({
                "id": result.id,
                "score": result.score,
                "fields": result.fields,
            }))?
        );
    }

    service.close().await?;
    Ok(())
}
