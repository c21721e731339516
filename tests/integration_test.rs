// End-to-end tests against the embedded backend
use async_trait::async_trait;
use serde_json::{json, Value};

use rankx::{
    load_ndjson, ExtractError, ReasoningClient, SearchRequest, SearchService, ServiceConfig,
};

fn book(id: &str, title: &str, description: &str, rating: f64, price: f64) -> Value {
    json!({
        "id": id,
        "type": "book",
        "category": ["Books"],
        "title": title,
        "description": description,
        "review_rating": rating,
        "review_count": 42,
        "price": price,
    })
}

async fn service_with_books() -> SearchService {
    let service = SearchService::new(ServiceConfig::default()).await.unwrap();
    service
        .upsert(&book(
            "cheap-good",
            "The Mind Explained",
            "an accessible introduction to psychology and behaviour",
            4.5,
            80.0,
        ))
        .await
        .unwrap();
    service
        .upsert(&book(
            "dear-ok",
            "Legions of Rome",
            "a detailed military history of the roman legions",
            3.0,
            150.0,
        ))
        .await
        .unwrap();
    service
}

#[tokio::test]
async fn test_filter_query_price_and_rating_gates() {
    let service = service_with_books().await;

    let response = service
        .search(
            "filter_query",
            SearchRequest::new()
                .with_param("filter_by_type", "book")
                .with_param("price_smaller_than", 100)
                .with_param("rating_bigger_than", 4),
        )
        .await
        .unwrap();

    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].id, "cheap-good");
    assert!(response.warning.is_none());
}

#[tokio::test]
async fn test_upsert_overwrites_existing_id() {
    let service = service_with_books().await;
    assert_eq!(service.document_count().await.unwrap(), 2);

    service
        .upsert(&book("cheap-good", "Retitled", "new description text", 2.0, 500.0))
        .await
        .unwrap();

    assert_eq!(service.document_count().await.unwrap(), 2);
    let response = service
        .search(
            "filter_query",
            SearchRequest::new().with_param("rating_bigger_than", 4),
        )
        .await
        .unwrap();
    assert!(response.results.is_empty(), "old field values must be gone");
}

#[tokio::test]
async fn test_similar_items_returns_seed_first() {
    let service = service_with_books().await;

    // Only the description space enabled: self-similarity is maximal
    let response = service
        .search(
            "similar_items_query",
            SearchRequest::new()
                .with_param("product_id", "dear-ok")
                .with_param("category_weight", 0)
                .with_param("title_weight", 0)
                .with_param("review_rating_maximizer_weight", 0)
                .with_param("price_minimizer_weight", 0),
        )
        .await
        .unwrap();

    assert_eq!(response.results[0].id, "dear-ok");
}

#[tokio::test]
async fn test_unknown_query_name() {
    let service = service_with_books().await;
    let err = service
        .search("mystery_query", SearchRequest::new())
        .await
        .unwrap_err();
    assert!(matches!(err, rankx::Error::QueryNotFound(_)));
}

#[tokio::test]
async fn test_param_violations_reported_together() {
    let service = service_with_books().await;
    let err = service
        .search(
            "filter_query",
            SearchRequest::new()
                .with_param("filter_by_type", "magazine")
                .with_param("price_smaller_than", "whenever"),
        )
        .await
        .unwrap_err();

    match err {
        rankx::Error::ParamValidation(violations) => assert_eq!(violations.len(), 2),
        other => panic!("expected ParamValidation, got {other}"),
    }
}

struct Scripted(Result<String, ()>);

#[async_trait]
impl ReasoningClient for Scripted {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, ExtractError> {
        self.0
            .clone()
            .map_err(|_| ExtractError::Service("scripted outage".into()))
    }
}

#[tokio::test]
async fn test_natural_query_extraction_end_to_end() {
    let reply = json!({
        "query_description": "psychology",
        "filter_by_type": "book",
        "price_smaller_than": 100,
        "rating_bigger_than": 4,
        "limit": 50,
    })
    .to_string();
    let service = service_with_books()
        .await
        .with_reasoning_client(Box::new(Scripted(Ok(reply))));

    let response = service
        .search(
            "filter_query",
            SearchRequest::new()
                .with_param("limit", 3)
                .with_natural_query(
                    "books on psychology with a price lower than 100 and a rating bigger than 4",
                ),
        )
        .await
        .unwrap();

    assert!(response.warning.is_none());
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].id, "cheap-good");
}

#[tokio::test]
async fn test_extracted_string_limit_does_not_fail_request() {
    let reply = json!({"query_description": "psychology", "limit": "5"}).to_string();
    let service = service_with_books()
        .await
        .with_reasoning_client(Box::new(Scripted(Ok(reply))));

    let response = service
        .search(
            "filter_query",
            SearchRequest::new().with_natural_query("five books on psychology"),
        )
        .await
        .unwrap();

    assert!(response.warning.is_none());
    assert!(!response.results.is_empty());
}

#[tokio::test]
async fn test_extraction_outage_degrades_but_answers() {
    let service = service_with_books()
        .await
        .with_reasoning_client(Box::new(Scripted(Err(()))));

    let response = service
        .search(
            "filter_query",
            SearchRequest::new()
                .with_param("limit", 2)
                .with_param("review_rating_maximizer_weight", 0)
                .with_param("price_minimizer_weight", 0)
                .with_natural_query("a detailed military history of the roman legions"),
        )
        .await
        .unwrap();

    assert!(response.warning.is_some());
    assert!(!response.results.is_empty());
    // Raw text became the description anchor, so the history book leads
    assert_eq!(response.results[0].id, "dear-ok");
}

#[tokio::test]
async fn test_natural_query_without_reasoning_config_degrades() {
    let service = service_with_books().await;

    let response = service
        .search(
            "filter_query",
            SearchRequest::new()
                .with_param("review_rating_maximizer_weight", 0)
                .with_param("price_minimizer_weight", 0)
                .with_natural_query("an accessible introduction to psychology and behaviour"),
        )
        .await
        .unwrap();

    assert!(response.warning.is_some());
    assert_eq!(response.results[0].id, "cheap-good");
}

#[tokio::test]
async fn test_ndjson_loader_maps_asin_and_skips_bad_records() {
    use std::io::Write;

    let service = SearchService::new(ServiceConfig::default()).await.unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "{}",
        json!({
            "asin": "B0001",
            "type": "book",
            "category": "Books",
            "title": "A Field Guide",
            "description": "a field guide to local birds",
            "review_rating": 4.2,
            "review_count": 9,
            "price": 21.0,
        })
    )
    .unwrap();
    // Type mismatch on price: rejected, batch continues
    writeln!(
        file,
        "{}",
        json!({
            "asin": "B0002",
            "type": "book",
            "category": "Books",
            "title": "Broken",
            "description": "broken record",
            "review_rating": 4.0,
            "review_count": 1,
            "price": "expensive",
        })
    )
    .unwrap();
    writeln!(file, "not json").unwrap();

    let report = load_ndjson(&service, file.path(), 100).await.unwrap();
    assert_eq!(report.loaded, 1);
    assert_eq!(report.rejected, 2);

    let response = service
        .search(
            "filter_query",
            SearchRequest::new().with_param("filter_by_type", "book"),
        )
        .await
        .unwrap();
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].id, "B0001");
}

#[tokio::test]
async fn test_semantic_query_title_anchor() {
    let service = service_with_books().await;

    let response = service
        .search(
            "semantic_query",
            SearchRequest::new()
                .with_param("query_title", "Legions of Rome")
                .with_param("title_similar_clause_weight", 5)
                .with_param("description_weight", 0)
                .with_param("review_rating_maximizer_weight", 0)
                .with_param("price_minimizer_weight", 0)
                .with_param("category_weight", 0),
        )
        .await
        .unwrap();

    assert_eq!(response.results[0].id, "dear-ok");
}
