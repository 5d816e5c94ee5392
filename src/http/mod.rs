//! HTTP surface of the relay.
//!
//! # Responsibilities
//! - Build the axum router and application state
//! - Handle `/image` (cached origin proxy) and `/rsshub/{*path}` (fan-out)
//! - Derive the externally visible base URL behind a reverse proxy
//!
//! # Design Decisions
//! - Handlers receive everything through [`AppState`]; no globals
//! - Middleware follows the process-wide tracing setup (TraceLayer)

pub mod base_url;
pub mod handlers;
pub mod server;

pub use server::{AppState, RelayServer};
