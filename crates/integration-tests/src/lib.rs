//! Integration tests for Boutique.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p boutique-integration-tests
//! ```
//!
//! No external services are needed: the storefront is served in-process on
//! an ephemeral port and client state lives in temporary directories.
//!
//! # Test Categories
//!
//! - `client_stores` - Store persistence and notifications across restarts
//! - `catalog_api` - Catalog client against a live storefront

use std::net::SocketAddr;

use boutique_storefront::catalog::Catalog;
use boutique_storefront::config::StorefrontConfig;
use boutique_storefront::state::AppState;
use tokio::task::JoinHandle;
use url::Url;

/// A storefront served on `127.0.0.1` for the lifetime of the value.
pub struct TestServer {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Serve `catalog` on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(catalog: Catalog) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no local address");

        let app = boutique_storefront::app(AppState::new(StorefrontConfig::default(), catalog));
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, handle }
    }

    /// Serve the bundled sample dataset.
    ///
    /// # Panics
    ///
    /// Panics if the dataset cannot be loaded or the listener cannot be bound.
    pub async fn spawn_sample() -> Self {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../storefront/data/catalog.json");
        let catalog = Catalog::load(&path).expect("Failed to load sample catalog");
        Self::spawn(catalog).await
    }

    /// Base URL of the running server.
    ///
    /// # Panics
    ///
    /// Panics if the address does not form a valid URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("Invalid test server URL")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
