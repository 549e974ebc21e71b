//! Integration tests for the catalog read API.
//!
//! A storefront is served in-process on an ephemeral port and exercised
//! through `CatalogClient` and raw HTTP.

use boutique_client::{
    CartItem, CatalogClient, CatalogError, ClientConfig, ClientStores, EventBus, MemoryStorage,
};
use boutique_core::{ProductId, ProductsResponse};
use boutique_integration_tests::TestServer;
use boutique_storefront::catalog::Catalog;
use reqwest::StatusCode;
use rust_decimal::Decimal;

async fn fetch_json(url: url::Url) -> serde_json::Value {
    reqwest::get(url)
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid JSON")
}

// =============================================================================
// Health Tests
// =============================================================================

#[tokio::test]
async fn test_health() {
    let server = TestServer::spawn_sample().await;

    let response = reqwest::get(format!("{}health", server.base_url()))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.expect("Missing body"), "ok");
}

// =============================================================================
// Catalog Client Tests
// =============================================================================

#[tokio::test]
async fn test_snapshot_loads_every_list() {
    let server = TestServer::spawn_sample().await;
    let client = CatalogClient::new(server.base_url());

    let snapshot = client.snapshot().await;
    assert_eq!(snapshot.products.len(), 6);
    assert_eq!(snapshot.categories.len(), 6);
    assert_eq!(snapshot.promotions.len(), 2);
    assert!(
        snapshot
            .products
            .iter()
            .any(|p| p.id == ProductId::from("gift-card"))
    );
}

#[tokio::test]
async fn test_search_returns_variants() {
    let server = TestServer::spawn_sample().await;
    let client = CatalogClient::new(server.base_url());

    let results = client.search("wool").await.expect("Search failed");
    let ids: Vec<_> = results.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "1-forest-green", "1-oat-melange", "4"]);

    let rose = client.search("rose wrap").await.expect("Search failed");
    assert_eq!(rose.len(), 1);
    let rose = rose.first().expect("Missing result");
    assert_eq!(rose.id, "2-dusty-rose");
    assert_eq!(rose.price, Decimal::new(399, 0));
}

#[tokio::test]
async fn test_search_without_match_suggests_best_stocked() {
    let server = TestServer::spawn_sample().await;
    let client = CatalogClient::new(server.base_url());

    let results = client.search("umbrella").await.expect("Search failed");
    let ids: Vec<_> = results.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["gift-card", "3", "1-oat-melange", "6", "1"]);
}

#[tokio::test]
async fn test_blank_search_lists_everything() {
    let server = TestServer::spawn_sample().await;
    let client = CatalogClient::new(server.base_url());

    let results = client.search("  ").await.expect("Search failed");
    // 6 products, 3 variants
    assert_eq!(results.len(), 9);
}

#[tokio::test]
async fn test_empty_catalog() {
    let server = TestServer::spawn(Catalog::default()).await;
    let client = CatalogClient::new(server.base_url());

    assert!(client.products().await.expect("Request failed").is_empty());
    assert!(client.categories().await.expect("Request failed").is_empty());
    assert!(client.promotions().await.expect("Request failed").is_empty());
    assert!(client.search("anything").await.expect("Search failed").is_empty());
}

#[tokio::test]
async fn test_invalidate_refetches() {
    let server = TestServer::spawn_sample().await;
    let client = CatalogClient::new(server.base_url());

    let first = client.categories().await.expect("Request failed");
    let cached = client.categories().await.expect("Request failed");
    assert_eq!(first, cached);

    client.invalidate();
    let refetched = client.categories().await.expect("Request failed");
    assert_eq!(first, refetched);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = TestServer::spawn_sample().await;
    let base = server.base_url().join("missing/").expect("Invalid URL");
    let client = CatalogClient::new(base);

    let err = client.products().await.expect_err("Expected an error");
    assert!(matches!(
        err,
        CatalogError::Status { status, .. } if status == StatusCode::NOT_FOUND
    ));
}

// =============================================================================
// Legacy Route Tests
// =============================================================================

#[tokio::test]
async fn test_legacy_aliases_match_canonical_routes() {
    let server = TestServer::spawn_sample().await;
    let base = server.base_url();

    for (canonical, legacy) in [
        ("api/categories", "api/catagories"),
        ("api/promotions", "api/promotion"),
    ] {
        let canonical = fetch_json(base.join(canonical).expect("Invalid URL")).await;
        let legacy = fetch_json(base.join(legacy).expect("Invalid URL")).await;
        assert_eq!(canonical, legacy);
    }
}

// =============================================================================
// End-to-End Tests
// =============================================================================

#[tokio::test]
async fn test_add_search_result_to_cart() {
    let server = TestServer::spawn_sample().await;
    let client = CatalogClient::new(server.base_url());
    let stores = ClientStores::new(
        MemoryStorage::new(),
        EventBus::new(),
        &ClientConfig::default(),
    );

    let results = client.search("linen").await.expect("Search failed");
    let shirt = results.first().expect("No results");

    stores.cart().add(&CartItem::from_expanded(shirt).with_size("M"));
    stores.cart().add(&CartItem::from_expanded(shirt).with_size("M"));
    stores.cart().add(&CartItem::from_expanded(shirt).with_size("L"));

    assert_eq!(stores.cart().len(), 2);
    assert_eq!(stores.cart().total(), Decimal::new(8985, 1));

    let url = server.base_url().join("api/products").expect("Invalid URL");
    let raw: ProductsResponse = reqwest::get(url)
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(raw.products.len(), 6);
}
