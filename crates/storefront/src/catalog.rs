//! Static catalog dataset.
//!
//! The whole catalog is one JSON document loaded once at startup. Missing
//! top-level lists are treated as empty.

use std::path::{Path, PathBuf};

use boutique_core::{Category, Product, Promotion};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors loading the catalog dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The loaded catalog.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub promotional_spots: Vec<Promotion>,
}

impl Catalog {
    /// Read and parse the dataset at `path`.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError` if the file cannot be read or is not a valid
    /// catalog document.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;

        info!(
            path = %path.display(),
            products = catalog.products.len(),
            categories = catalog.categories.len(),
            promotions = catalog.promotional_spots.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse a dataset document.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Parse` if `raw` is not a valid catalog document.
    pub fn from_json(raw: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(raw)?)
    }
}
