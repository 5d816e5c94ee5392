//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → env.rs (read & parse once at startup)
//!     → RelayConfig (immutable)
//!     → shared via application state with all handlers
//! ```
//!
//! # Design Decisions
//! - Config is read from the environment exactly once; handlers never
//!   consult the environment directly
//! - All fields have defaults so the relay runs with no environment set
//! - Per-request values (referer, user-agent) override config defaults

pub mod env;
pub mod schema;

pub use schema::BackendConfig;
pub use schema::CacheConfig;
pub use schema::ListenerConfig;
pub use schema::RelayConfig;
pub use schema::UpstreamConfig;
