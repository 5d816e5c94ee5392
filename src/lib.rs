//! feed-relay: caching image proxy and feed-aggregator relay.
//!
//! Two responsibilities:
//! - `/image` proxies and caches remote images, rewriting the referer
//!   and user-agent headers to satisfy hotlink protection
//! - `/rsshub/{*path}` forwards feed requests to the first responsive
//!   backend instance, optionally rewriting embedded image URLs so the
//!   client fetches them through the image proxy

pub mod cache;
pub mod config;
pub mod http;
pub mod rewrite;
pub mod upstream;

pub use config::RelayConfig;
pub use http::RelayServer;
