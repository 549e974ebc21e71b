//! Response envelopes for the catalog read API.
//!
//! Shared by the storefront handlers and the client so both sides agree on
//! the wire shape.

use serde::{Deserialize, Serialize};

use crate::types::catalog::{Category, Product, Promotion};

/// `GET /api/products` response.
///
/// Plain listings carry [`Product`]s; searches carry
/// [`ExpandedProduct`](crate::ExpandedProduct)s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductsResponse<T = Product> {
    pub products: Vec<T>,
}

/// `GET /api/categories` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

/// `GET /api/promotions` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionsResponse {
    pub promotional_spots: Vec<Promotion>,
}
