//! Product search over the in-memory catalog.
//!
//! Every product is expanded into its base entry plus one entry per variant,
//! and each entry is matched on its Danish and English names with a
//! case-insensitive substring test. A search that matches nothing answers
//! with the best-stocked entries instead of an empty page.

use boutique_core::{ExpandedProduct, Product};
use tracing::{debug, instrument};

/// Number of entries returned when a search matches nothing.
pub const FALLBACK_LIMIT: usize = 5;

/// Search `products` for `term`.
///
/// Results keep catalog order, with each variant directly after its base
/// product. When nothing matches, returns up to [`FALLBACK_LIMIT`] entries by
/// descending stock, ties in catalog order.
#[instrument(skip(products), fields(products = products.len()))]
pub fn search(products: &[Product], term: &str) -> Vec<ExpandedProduct> {
    let expanded: Vec<ExpandedProduct> = products.iter().flat_map(Product::expand).collect();
    let needle = term.trim().to_lowercase();

    let matches: Vec<ExpandedProduct> = expanded
        .iter()
        .filter(|entry| name_matches(entry, &needle))
        .cloned()
        .collect();

    if !matches.is_empty() {
        debug!(results = matches.len(), "Search matched");
        return matches;
    }

    debug!("No matches, falling back to best-stocked products");
    best_stocked(expanded, FALLBACK_LIMIT)
}

fn name_matches(entry: &ExpandedProduct, needle: &str) -> bool {
    entry
        .name
        .locales()
        .any(|name| name.to_lowercase().contains(needle))
}

/// The `limit` entries with the most stock.
fn best_stocked(mut entries: Vec<ExpandedProduct>, limit: usize) -> Vec<ExpandedProduct> {
    // sort_by is stable, so equal stock keeps catalog order
    entries.sort_by(|a, b| b.stock.cmp(&a.stock));
    entries.truncate(limit);
    entries
}
