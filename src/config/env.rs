//! Configuration loading from the process environment.
//!
//! Recognized variables:
//! - `PORT`: listening port (default 8080)
//! - `DEFAULT_REFERER`: fallback referer for origin fetches
//! - `USER_AGENT_HEADER`: overrides the incoming user-agent when set
//! - `PROXY_URI`: forward proxy for all outbound calls
//! - `BACKEND_INSTANCES`: comma-separated backend base URLs
//! - `CACHE_MAX_ENTRIES`, `CACHE_TTL_SECS`: cache bounds

use std::env;
use std::str::FromStr;

use crate::config::schema::RelayConfig;

impl RelayConfig {
    /// Build a config from the process environment, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = RelayConfig::default();

        if let Some(port) = parsed_var("PORT") {
            config.listener.port = port;
        }
        if let Some(max_entries) = parsed_var("CACHE_MAX_ENTRIES") {
            config.cache.max_entries = max_entries;
        }
        if let Some(ttl_secs) = parsed_var("CACHE_TTL_SECS") {
            config.cache.ttl_secs = ttl_secs;
        }
        if let Ok(referer) = env::var("DEFAULT_REFERER") {
            config.upstream.default_referer = referer;
        }
        config.upstream.user_agent_override = env::var("USER_AGENT_HEADER").ok();
        config.upstream.proxy_uri = env::var("PROXY_URI").ok();

        if let Ok(instances) = env::var("BACKEND_INSTANCES") {
            let instances: Vec<String> = instances
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.trim_end_matches('/').to_string())
                .collect();
            if !instances.is_empty() {
                config.backends.instances = instances;
            }
        }

        config
    }
}

/// Read and parse an environment variable, logging and discarding
/// values that do not parse.
fn parsed_var<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = key, value = %raw, "ignoring unparsable environment variable");
            None
        }
    }
}
