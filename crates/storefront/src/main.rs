//! Boutique Storefront - catalog read API.
//!
//! This binary serves the catalog dataset as JSON on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Catalog loaded once at startup from a JSON file
//! - Client-side state (cart, wishlist, toasts) lives in `boutique-client`

#![cfg_attr(not(test), forbid(unsafe_code))]

use boutique_storefront::catalog::Catalog;
use boutique_storefront::config::StorefrontConfig;
use boutique_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Start the Sentry client when `SENTRY_DSN` is configured.
///
/// The returned guard flushes pending events on drop, so `main` holds it
/// until the server has shut down.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let Some(dsn) = config.sentry_dsn.as_deref() else {
        tracing::debug!("SENTRY_DSN not set, error reporting disabled");
        return None;
    };

    let options = sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Into::into),
        sample_rate: config.sentry_sample_rate,
        traces_sample_rate: config.sentry_traces_sample_rate,
        attach_stacktrace: true,
        ..Default::default()
    };
    let guard = sentry::init((dsn, options));

    tracing::info!(
        environment = config.sentry_environment.as_deref().unwrap_or("default"),
        "Sentry initialized"
    );
    Some(guard)
}

/// Warnings and errors become Sentry events; request-level info and debug
/// lines ride along as breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    let level = *metadata.level();
    if level <= tracing::Level::WARN {
        sentry_tracing::EventFilter::Event
    } else if level <= tracing::Level::DEBUG {
        sentry_tracing::EventFilter::Breadcrumb
    } else {
        sentry_tracing::EventFilter::Ignore
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "boutique_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let catalog = Catalog::load(&config.catalog_path).expect("Failed to load catalog");
    let state = AppState::new(config.clone(), catalog);

    let app = boutique_storefront::app(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Resolve once the process is asked to stop, so in-flight catalog requests
/// can finish before the listener closes.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = ctrl_c => "Ctrl+C",
        () = terminate => "SIGTERM",
    };

    tracing::info!(signal, "Shutting down storefront");
}
