//! Integration tests for `CatalogClient` and `CatalogCache`.
//!
//! HTTP sources are served by `wiremock`; file sources use temp files.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vitrine_catalog::{CatalogCache, CatalogClient, CatalogError, ProductSource};
use vitrine_core::Product;

fn test_client(source: &str) -> CatalogClient {
    CatalogClient::new(source, 5, "vitrine-test/0.1").expect("failed to build test CatalogClient")
}

fn catalog_json() -> serde_json::Value {
    json!([
        {"id": 1, "title": "Painel", "prices": {"BR": "R$ 49,90"}},
        {"id": "consultoria", "title": "Consultoria", "countries": ["BR"]}
    ])
}

// ---------------------------------------------------------------------------
// HTTP sources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetches_and_normalizes_from_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assets/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/assets/products.json", server.uri()));
    let products = client.fetch_products().await.expect("fetch should succeed");

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id.as_deref(), Some("1"));
    assert_eq!(products[1].countries, Some(vec!["BR".to_string()]));
}

#[tokio::test]
async fn non_array_body_is_empty_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": []})))
        .mount(&server)
        .await;

    let products = test_client(&server.uri()).fetch_products().await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn not_found_is_typed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).fetch_products().await;
    assert!(matches!(result, Err(CatalogError::NotFound { .. })), "{result:?}");
}

#[tokio::test]
async fn server_error_is_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).fetch_products().await;
    assert!(
        matches!(result, Err(CatalogError::UnexpectedStatus { status: 503, .. })),
        "{result:?}"
    );
}

#[tokio::test]
async fn invalid_json_is_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).fetch_products().await;
    assert!(matches!(result, Err(CatalogError::Deserialize { .. })), "{result:?}");
}

// ---------------------------------------------------------------------------
// File sources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reads_catalog_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("products.json");
    std::fs::write(&file, catalog_json().to_string()).unwrap();

    let products = test_client(file.to_str().unwrap())
        .fetch_products()
        .await
        .unwrap();
    assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("absent.json");
    let result = test_client(file.to_str().unwrap()).fetch_products().await;
    assert!(matches!(result, Err(CatalogError::Io { .. })), "{result:?}");
}

// ---------------------------------------------------------------------------
// CatalogCache
// ---------------------------------------------------------------------------

/// Succeeds on the first fetch, fails on every later one.
struct FlakySource {
    calls: AtomicUsize,
}

impl ProductSource for FlakySource {
    fn fetch_products(&self) -> BoxFuture<'_, Result<Vec<Product>, CatalogError>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            if call == 0 {
                Ok(vec![Product {
                    id: Some("a".to_string()),
                    ..Product::default()
                }])
            } else {
                Err(CatalogError::NotFound {
                    url: "http://example.invalid/products.json".to_string(),
                })
            }
        })
    }
}

#[tokio::test]
async fn cache_keeps_previous_snapshot_on_failed_reload() {
    let source = Arc::new(FlakySource {
        calls: AtomicUsize::new(0),
    });
    let cache = CatalogCache::new(source.clone());

    assert!(!cache.is_loaded().await);
    assert!(cache.products().await.is_empty());

    assert_eq!(cache.load().await.unwrap(), 1);
    assert!(cache.load().await.is_err());

    let products = cache.products().await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id.as_deref(), Some("a"));
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn cache_fetches_exactly_once_per_load() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_json()))
        .expect(1)
        .mount(&server)
        .await;

    let cache = CatalogCache::new(Arc::new(test_client(&server.uri())));
    cache.load().await.unwrap();
    let first = cache.products().await;
    let second = cache.products().await;
    assert!(Arc::ptr_eq(&first, &second));
}
