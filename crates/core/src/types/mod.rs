//! Core types for Boutique.
//!
//! This module provides type-safe wrappers for catalog identifiers and the
//! shapes of the static product dataset.

pub mod api;
pub mod catalog;
pub mod id;

pub use api::{CategoriesResponse, ProductsResponse, PromotionsResponse};
pub use catalog::{
    Category, ExpandedProduct, FocalPoint, LocalizedName, Product, Promotion, PromotionImage,
    Variant, color_slug, variant_id,
};
pub use id::*;
