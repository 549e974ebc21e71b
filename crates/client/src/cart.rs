//! Cart store.
//!
//! Lines are merged by identity key `(product_id, selected_size,
//! selected_variant_id)`: adding an item whose key is already in the cart
//! bumps that line's quantity instead of inserting a second line. An absent
//! size or variant is part of the key, so "no size" only merges with "no
//! size".
//!
//! Every mutation writes the full line list to the backing store under
//! [`keys::CART`] and then publishes it on [`topics::CART_UPDATED`].

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use boutique_core::{ExpandedProduct, Product, ProductId, VariantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::bus::{EventBus, topics};
use crate::lock;
use crate::storage::{KeyValueStore, keys, load_snapshot, save_snapshot};

/// Identity of a cart line for merge purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub selected_size: Option<String>,
    pub selected_variant_id: Option<VariantId>,
}

/// JSON keys owned by [`CartLine`]'s own fields.
///
/// Display attributes are flattened into the same object, so a bag entry
/// under one of these names would shadow or duplicate the real field.
pub const RESERVED_KEYS: [&str; 5] = [
    "productId",
    "unitPrice",
    "quantity",
    "selectedSize",
    "selectedVariantId",
];

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// A product selection about to be added to the cart.
///
/// `attributes` carries display fields copied from the product (name, brand,
/// images, ...). They are stored alongside the line verbatim, except for
/// entries named after a line field (see [`RESERVED_KEYS`]), which are
/// dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_variant_id: Option<VariantId>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl CartItem {
    /// Create an item with no size, no variant and no display attributes.
    pub fn new(product_id: impl Into<ProductId>, unit_price: Decimal) -> Self {
        Self {
            product_id: product_id.into(),
            unit_price,
            selected_size: None,
            selected_variant_id: None,
            attributes: Map::new(),
        }
    }

    /// Build an item from a catalog product, copying its display fields.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        let mut item = Self::new(product.id.clone(), product.price);
        item.attributes.insert("brand".into(), product.brand.clone().into());
        item.attributes.insert("color".into(), product.color.clone().into());
        item.attributes.insert(
            "name".into(),
            serde_json::to_value(&product.name).unwrap_or(Value::Null),
        );
        item.attributes
            .insert("images".into(), product.images.clone().into());
        item
    }

    /// Build an item from a search result.
    ///
    /// Variant entries select the variant by their synthetic id.
    #[must_use]
    pub fn from_expanded(product: &ExpandedProduct) -> Self {
        let mut item = Self::new(product.product_id.clone(), product.price);
        if product.is_variant() {
            item.selected_variant_id = Some(VariantId::from(product.id.as_str()));
        }
        item.attributes.insert("brand".into(), product.brand.clone().into());
        item.attributes.insert("color".into(), product.color.clone().into());
        item.attributes.insert(
            "name".into(),
            serde_json::to_value(&product.name).unwrap_or(Value::Null),
        );
        item.attributes
            .insert("images".into(), product.images.clone().into());
        item
    }

    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.selected_size = Some(size.into());
        self
    }

    #[must_use]
    pub fn with_variant(mut self, variant_id: impl Into<VariantId>) -> Self {
        self.selected_variant_id = Some(variant_id.into());
        self
    }

    /// Attach a display attribute. Reserved keys are ignored.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if is_reserved(&key) {
            debug!(key = %key, "Ignoring reserved cart attribute");
        } else {
            self.attributes.insert(key, value.into());
        }
        self
    }

    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id.clone(),
            selected_size: self.selected_size.clone(),
            selected_variant_id: self.selected_variant_id.clone(),
        }
    }
}

const fn default_quantity() -> u32 {
    1
}

/// One purchasable line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_variant_id: Option<VariantId>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl CartLine {
    fn from_item(item: CartItem) -> Self {
        let mut attributes = item.attributes;
        attributes.retain(|key, _| !is_reserved(key));
        Self {
            product_id: item.product_id,
            unit_price: item.unit_price,
            quantity: 1,
            selected_size: item.selected_size,
            selected_variant_id: item.selected_variant_id,
            attributes,
        }
    }

    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id.clone(),
            selected_size: self.selected_size.clone(),
            selected_variant_id: self.selected_variant_id.clone(),
        }
    }

    fn is_same_line(&self, item: &CartItem) -> bool {
        self.product_id == item.product_id
            && self.selected_size == item.selected_size
            && self.selected_variant_id == item.selected_variant_id
    }

    /// Price of this line. A quantity below one counts as one.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity.max(1))
    }
}

struct CartInner {
    lines: Mutex<Vec<CartLine>>,
    storage: Arc<dyn KeyValueStore>,
    bus: EventBus,
}

/// Shared handle to the cart.
///
/// Obtain it from [`ClientStores::cart`](crate::ClientStores::cart); clones
/// share the same lines.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartInner>,
}

impl CartStore {
    /// Build the cart, rehydrating from [`keys::CART`].
    pub(crate) fn load(storage: Arc<dyn KeyValueStore>, bus: EventBus) -> Self {
        let lines: Vec<CartLine> = load_snapshot(storage.as_ref(), keys::CART);
        debug!(lines = lines.len(), "Cart loaded");

        Self {
            inner: Arc::new(CartInner {
                lines: Mutex::new(lines),
                storage,
                bus,
            }),
        }
    }

    /// Add one unit of `item`.
    ///
    /// If a line with the same identity key exists its quantity goes up by
    /// one and its other fields stay as they were; otherwise a copy of `item`
    /// is appended with quantity 1.
    pub fn add(&self, item: &CartItem) {
        let mut lines = lock(&self.inner.lines);
        if let Some(line) = lines.iter_mut().find(|line| line.is_same_line(item)) {
            line.quantity = line.quantity.saturating_add(1);
            debug!(product_id = %item.product_id, quantity = line.quantity, "Cart line merged");
        } else {
            lines.push(CartLine::from_item(item.clone()));
            debug!(product_id = %item.product_id, "Cart line added");
        }
        self.commit(lines);
    }

    /// Remove the line at `index`.
    ///
    /// An out-of-range index is ignored: views can hold an index from a
    /// render that a concurrent update has already invalidated. Returns
    /// whether a line was removed.
    pub fn remove_at(&self, index: usize) -> bool {
        let mut lines = lock(&self.inner.lines);
        if index >= lines.len() {
            debug!(index, len = lines.len(), "Ignoring cart removal out of range");
            return false;
        }
        lines.remove(index);
        self.commit(lines);
        true
    }

    /// Set the quantity of the line at `index`.
    ///
    /// Callers must pass `quantity >= 1`; this is not checked here. An
    /// out-of-range index is ignored. Returns whether a line was updated.
    pub fn set_quantity(&self, index: usize, quantity: u32) -> bool {
        let mut lines = lock(&self.inner.lines);
        let Some(line) = lines.get_mut(index) else {
            debug!(index, "Ignoring cart quantity update out of range");
            return false;
        };
        line.quantity = quantity;
        self.commit(lines);
        true
    }

    /// Remove every line for `product_id`, whatever its size or variant.
    ///
    /// Returns the number of lines removed.
    pub fn remove_product(&self, product_id: &ProductId) -> usize {
        let mut lines = lock(&self.inner.lines);
        let before = lines.len();
        lines.retain(|line| &line.product_id != product_id);
        let removed = before - lines.len();
        if removed > 0 {
            self.commit(lines);
        }
        removed
    }

    /// Remove every line.
    pub fn clear(&self) {
        let mut lines = lock(&self.inner.lines);
        lines.clear();
        self.commit(lines);
    }

    /// Sum of `unit_price * max(quantity, 1)` over all lines, computed on read.
    #[must_use]
    pub fn total(&self) -> Decimal {
        lock(&self.inner.lines).iter().map(CartLine::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        lock(&self.inner.lines)
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Snapshot of the current lines, in display order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        lock(&self.inner.lines).clone()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<CartLine> {
        lock(&self.inner.lines).get(index).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.inner.lines).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.inner.lines).is_empty()
    }

    /// Persist while still holding the lock, then notify without it.
    fn commit(&self, lines: MutexGuard<'_, Vec<CartLine>>) {
        save_snapshot(self.inner.storage.as_ref(), keys::CART, &lines);
        let snapshot = lines.clone();
        drop(lines);
        self.inner.bus.publish(topics::CART_UPDATED, &snapshot);
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &*lock(&self.inner.lines))
            .finish_non_exhaustive()
    }
}
