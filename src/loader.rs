//! Batch ingestion from newline-delimited JSON
//!
//! Reads records in fixed-size chunks so peak memory tracks the chunk
//! size, not the corpus size. The source's `asin` field maps onto the
//! schema's `id`. A record that fails parsing or field validation is
//! rejected and logged; the batch continues.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use rankx_core::Result;

use crate::service::SearchService;

/// Source field carrying the document id in the catalog dataset
const ID_SOURCE_FIELD: &str = "asin";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub rejected: usize,
}

/// Load an NDJSON file into the service's store
pub async fn load_ndjson(
    service: &SearchService,
    path: impl AsRef<Path>,
    chunk_size: usize,
) -> Result<LoadReport> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut report = LoadReport::default();
    let mut chunk: Vec<Value> = Vec::with_capacity(chunk_size);

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&line) {
            Ok(record) => chunk.push(map_record(record)),
            Err(err) => {
                warn!(line = line_no + 1, error = %err, "rejecting unparsable record");
                report.rejected += 1;
            }
        }
        if chunk.len() == chunk_size {
            flush(service, &mut chunk, &mut report).await;
        }
    }
    flush(service, &mut chunk, &mut report).await;

    info!(
        path = %path.display(),
        loaded = report.loaded,
        rejected = report.rejected,
        "batch load finished"
    );
    Ok(report)
}

/// Map the source record onto schema fields (`asin` becomes `id`)
fn map_record(mut record: Value) -> Value {
    if let Some(object) = record.as_object_mut() {
        if !object.contains_key("id") {
            if let Some(asin) = object.remove(ID_SOURCE_FIELD) {
                object.insert("id".to_string(), asin);
            }
        }
    }
    record
}

async fn flush(service: &SearchService, chunk: &mut Vec<Value>, report: &mut LoadReport) {
    for record in chunk.drain(..) {
        match service.upsert(&record).await {
            Ok(_) => report.loaded += 1,
            Err(err) => {
                warn!(error = %err, "rejecting invalid record");
                report.rejected += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_record_renames_asin() {
        let mapped = map_record(json!({"asin": "B001", "title": "x"}));
        assert_eq!(mapped["id"], json!("B001"));
        assert!(mapped.get("asin").is_none());
    }

    #[test]
    fn test_map_record_keeps_existing_id() {
        let mapped = map_record(json!({"id": "keep", "asin": "B001"}));
        assert_eq!(mapped["id"], json!("keep"));
    }
}
