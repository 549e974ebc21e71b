//! HTTP route handlers for the catalog read API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Catalog API (JSON)
//! GET  /api/products           - Product listing
//! GET  /api/products?q=term    - Product and variant search
//! GET  /api/categories         - Category listing
//! GET  /api/promotions         - Promotional spots
//!
//! # Legacy aliases
//! GET  /api/catagories         - Same as /api/categories
//! GET  /api/promotion          - Same as /api/promotions
//! ```

pub mod categories;
pub mod products;
pub mod promotions;

use axum::{Router, extract::OriginalUri, routing::get};

use crate::error::AppError;
use crate::state::AppState;

/// Create the catalog API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/categories", get(categories::index))
        .route("/catagories", get(categories::index))
        .route("/promotions", get(promotions::index))
        .route("/promotion", get(promotions::index))
        .fallback(not_found)
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}

async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use boutique_core::{
        CategoriesResponse, ExpandedProduct, ProductId, ProductsResponse, PromotionsResponse,
    };
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    use crate::catalog::Catalog;
    use crate::config::StorefrontConfig;

    use super::*;

    const CATALOG: &str = r#"{
        "products": [
            {
                "id": 1, "brand": "Nordlys", "price": 699.95, "stock": 4, "color": "Navy Blue",
                "size": ["M"], "name": { "dk": "Strikbluse", "en": "Knit sweater" },
                "images": [], "categories": ["knitwear"],
                "variants": [{ "color": "Forest Green", "stock": 9 }]
            },
            {
                "id": "gift-card", "brand": "Boutique", "price": 250, "stock": 99, "color": "",
                "size": [], "name": { "dk": "Gavekort", "en": "Gift card" },
                "images": [], "categories": ["gifts"]
            }
        ],
        "categories": [{ "id": 1, "name": "Knitwear" }],
        "promotionalSpots": [{
            "link": "/sale", "position": 1, "type": "hero",
            "image": {
                "aspectRatio": "16:9", "imageUrl": "sale.jpg",
                "focalPoint": { "x": 0.5, "y": 0.5 }, "maxWidth": "1600px", "alt": ""
            },
            "imageAltText": "Sale", "_alias": "sale"
        }]
    }"#;

    fn app_with(catalog: Catalog) -> Router {
        crate::app(AppState::new(StorefrontConfig::default(), catalog))
    }

    fn app() -> Router {
        app_with(Catalog::from_json(CATALOG).unwrap())
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json<T: DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = get(app(), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_products_listing() {
        let response = get(app(), "/api/products").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: ProductsResponse = json(response).await;
        let ids: Vec<_> = body.products.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![ProductId::from(1), ProductId::from("gift-card")]);
    }

    #[tokio::test]
    async fn test_blank_query_is_plain_listing() {
        let response = get(app(), "/api/products?q=%20%20").await;
        let body: ProductsResponse = json(response).await;
        assert_eq!(body.products.len(), 2);
    }

    #[tokio::test]
    async fn test_products_search_expands_variants() {
        let response = get(app(), "/api/products?q=SWEATER").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: ProductsResponse<ExpandedProduct> = json(response).await;
        let ids: Vec<_> = body.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "1-forest-green"]);
    }

    #[tokio::test]
    async fn test_products_search_falls_back_to_stock() {
        let response = get(app(), "/api/products?q=umbrella").await;
        let body: ProductsResponse<ExpandedProduct> = json(response).await;
        let ids: Vec<_> = body.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["gift-card", "1-forest-green", "1"]);
    }

    #[tokio::test]
    async fn test_search_term_too_long() {
        let uri = format!("/api/products?q={}", "a".repeat(201));
        let response = get(app(), &uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_categories_and_legacy_alias() {
        for uri in ["/api/categories", "/api/catagories"] {
            let response = get(app(), uri).await;
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            let body: CategoriesResponse = json(response).await;
            assert_eq!(body.categories.len(), 1, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_promotions_and_legacy_alias() {
        for uri in ["/api/promotions", "/api/promotion"] {
            let response = get(app(), uri).await;
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            let body: PromotionsResponse = json(response).await;
            assert_eq!(body.promotional_spots.len(), 1, "{uri}");
            assert_eq!(body.promotional_spots.first().unwrap().alias, "sale");
        }
    }

    #[tokio::test]
    async fn test_empty_catalog_returns_empty_lists() {
        let response = get(app_with(Catalog::default()), "/api/products").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: ProductsResponse = json(response).await;
        assert!(body.products.is_empty());

        let response = get(app_with(Catalog::default()), "/api/promotions").await;
        let body: PromotionsResponse = json(response).await;
        assert!(body.promotional_spots.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_api_path() {
        let response = get(app(), "/api/orders").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, "Not found: /api/orders");
    }
}
