//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! relay. All types derive Serde traits so a config can be round-tripped
//! for diagnostics.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Response cache bounds.
    pub cache: CacheConfig,

    /// Outbound request settings (referer/user-agent policy, forward proxy).
    pub upstream: UpstreamConfig,

    /// Feed-aggregator backend instances.
    pub backends: BackendConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Listening port for the HTTP surface.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl ListenerConfig {
    /// Bind address derived from the configured port.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Response cache bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of live entries.
    pub max_entries: usize,

    /// Entry lifetime in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 100,
            ttl_secs: 5 * 60,
        }
    }
}

/// Outbound request settings shared by the origin fetcher and the
/// backend fan-out.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Fallback referer when none is supplied per-request.
    pub default_referer: String,

    /// If set, overrides the incoming client's user-agent for all
    /// origin fetches.
    pub user_agent_override: Option<String>,

    /// If set, all outbound calls are routed through this forward proxy.
    pub proxy_uri: Option<String>,
}

/// Feed-aggregator backend instances.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Ordered base URLs; failover tries them first to last on every
    /// request.
    pub instances: Vec<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            instances: vec!["http://rsshub:1200".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.listener.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.cache.max_entries, 100);
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.upstream.default_referer, "");
        assert!(config.upstream.user_agent_override.is_none());
        assert!(config.upstream.proxy_uri.is_none());
        assert_eq!(config.backends.instances, vec!["http://rsshub:1200"]);
    }
}
