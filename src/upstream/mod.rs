//! Outbound HTTP subsystem.
//!
//! # Responsibilities
//! - Build the shared outbound client (optionally behind a forward proxy)
//! - Fetch origin images with spoofed referer/user-agent headers
//! - Fan requests out across feed-aggregator backend instances
//!
//! # Design Decisions
//! - One reqwest client for the whole process; both the origin fetcher
//!   and the fan-out forwarder share it, so a configured `PROXY_URI`
//!   covers every outbound call
//! - No retries anywhere: the fetcher fails fast, the forwarder tries
//!   each instance at most once per request

pub mod fetcher;
pub mod forward;

pub use fetcher::OriginFetcher;
pub use forward::Forwarder;

use thiserror::Error;

/// Failure to construct the shared outbound client at startup.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid forward proxy address: {0}")]
    InvalidProxy(#[source] reqwest::Error),

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

/// A single outbound GET could not complete (DNS, connect, timeout,
/// invalid URL). Never retried automatically.
#[derive(Debug, Error)]
#[error("request to {url} failed: {source}")]
pub struct FetchError {
    pub url: String,
    #[source]
    pub source: reqwest::Error,
}

/// Every configured backend instance was tried and none returned 200.
#[derive(Debug, Error)]
#[error("no backend instance returned a 200 status code")]
pub struct BackendsExhausted;

/// Build the process-wide outbound client, routed through the forward
/// proxy when one is configured.
pub fn build_client(proxy_uri: Option<&str>) -> Result<reqwest::Client, ClientError> {
    let mut builder = reqwest::Client::builder();
    if let Some(uri) = proxy_uri {
        let proxy = reqwest::Proxy::all(uri).map_err(ClientError::InvalidProxy)?;
        builder = builder.proxy(proxy);
    }
    builder.build().map_err(ClientError::Build)
}
