//! Boutique Core - Shared types library.
//!
//! This crate provides common types used across all Boutique components:
//! - `storefront` - Catalog read API server
//! - `client` - Client-side cart, wishlist and toast stores
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! This keeps it lightweight and allows it to be used on either side of the
//! catalog API.
//!
//! # Modules
//!
//! - [`types`] - Identifier wrappers, the catalog data model and API envelopes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
