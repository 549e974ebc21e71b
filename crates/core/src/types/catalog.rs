//! Catalog data model.
//!
//! These types mirror the static JSON dataset served by the storefront. Field
//! names follow the dataset's camelCase convention on the wire.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::{CategoryId, ProductId};

/// A product name in every storefront locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    /// Danish name.
    #[serde(default)]
    pub dk: String,
    /// English name.
    #[serde(default)]
    pub en: String,
}

impl LocalizedName {
    /// Iterate over the name in each locale.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        [self.dk.as_str(), self.en.as_str()].into_iter()
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub brand: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub size: Vec<String>,
    #[serde(default)]
    pub name: LocalizedName,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Color variants sold under the same product.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Variant>,
}

/// A color variant of a product.
///
/// Unset fields inherit the base product's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub color: String,
    #[serde(default)]
    pub size: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<LocalizedName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A promotional spot shown on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub link: String,
    pub position: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub image: PromotionImage,
    #[serde(default)]
    pub image_alt_text: String,
    #[serde(rename = "_alias", default)]
    pub alias: String,
}

/// Image metadata for a promotional spot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionImage {
    pub aspect_ratio: String,
    pub image_url: String,
    pub focal_point: FocalPoint,
    pub max_width: String,
    #[serde(default)]
    pub alt: String,
}

/// Relative focal point of an image, each axis in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

/// A base product or one of its variants surfaced as an independent entry.
///
/// Search results list every variant next to its base product. Variant
/// entries carry a synthetic `id` derived from the product id and the
/// variant's color; `product_id` always points back at the base product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedProduct {
    pub id: String,
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_color: Option<String>,
    pub brand: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: u32,
    pub color: String,
    pub size: Vec<String>,
    pub name: LocalizedName,
    pub images: Vec<String>,
    pub categories: Vec<String>,
}

impl ExpandedProduct {
    /// Whether this entry represents a variant rather than the base product.
    #[must_use]
    pub const fn is_variant(&self) -> bool {
        self.variant_color.is_some()
    }
}

impl Product {
    /// The base product followed by one entry per variant.
    ///
    /// Variant fields left unset inherit the base product's values, including
    /// the name.
    #[must_use]
    pub fn expand(&self) -> Vec<ExpandedProduct> {
        let base = ExpandedProduct {
            id: self.id.to_string(),
            product_id: self.id.clone(),
            variant_color: None,
            brand: self.brand.clone(),
            price: self.price,
            stock: self.stock,
            color: self.color.clone(),
            size: self.size.clone(),
            name: self.name.clone(),
            images: self.images.clone(),
            categories: self.categories.clone(),
        };

        let variants = self.variants.iter().map(|variant| ExpandedProduct {
            id: variant_id(&self.id, &variant.color),
            product_id: self.id.clone(),
            variant_color: Some(variant.color.clone()),
            brand: self.brand.clone(),
            price: variant.price.unwrap_or(self.price),
            stock: variant.stock.unwrap_or(self.stock),
            color: variant.color.clone(),
            size: if variant.size.is_empty() {
                self.size.clone()
            } else {
                variant.size.clone()
            },
            name: variant.name.clone().unwrap_or_else(|| self.name.clone()),
            images: if variant.images.is_empty() {
                self.images.clone()
            } else {
                variant.images.clone()
            },
            categories: self.categories.clone(),
        });

        std::iter::once(base).chain(variants).collect()
    }
}

/// Synthetic id of a variant entry: `"{product_id}-{color_slug}"`.
#[must_use]
pub fn variant_id(product_id: &ProductId, color: &str) -> String {
    format!("{product_id}-{}", color_slug(color))
}

/// Lowercase `color`, join whitespace-separated words with `-` and drop
/// every other non-alphanumeric character.
#[must_use]
pub fn color_slug(color: &str) -> String {
    color
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
