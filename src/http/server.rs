//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router with both endpoints
//! - Construct the shared application state (cache, fetcher, forwarder)
//! - Bind the server to a listener and serve with graceful shutdown
//!
//! # Design Decisions
//! - The cache is an explicitly-lifetimed component owned by the state,
//!   not a module-level global
//! - One outbound client is shared by the fetcher and the forwarder so
//!   the forward-proxy setting covers every outbound call

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::cache::ResponseCache;
use crate::config::RelayConfig;
use crate::http::handlers::{feed_handler, image_handler};
use crate::upstream::{build_client, ClientError, Forwarder, OriginFetcher};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ResponseCache>,
    pub fetcher: Arc<OriginFetcher>,
    pub forwarder: Arc<Forwarder>,
}

/// HTTP server for the relay.
pub struct RelayServer {
    router: Router,
}

impl RelayServer {
    /// Create a new server with the given configuration.
    ///
    /// Fails only when the configured forward proxy address is invalid
    /// or the outbound client cannot be built.
    pub fn new(config: &RelayConfig) -> Result<Self, ClientError> {
        let client = build_client(config.upstream.proxy_uri.as_deref())?;

        let state = AppState {
            cache: Arc::new(ResponseCache::new(
                config.cache.max_entries,
                Duration::from_secs(config.cache.ttl_secs),
            )),
            fetcher: Arc::new(OriginFetcher::new(client.clone(), &config.upstream)),
            forwarder: Arc::new(Forwarder::new(client, config.backends.instances.clone())),
        };

        Ok(Self {
            router: Self::build_router(state),
        })
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/image", get(image_handler))
            .route("/rsshub/{*path}", get(feed_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router; lets tests drive handlers without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
