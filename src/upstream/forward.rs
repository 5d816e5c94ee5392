//! Backend fan-out forwarding.
//!
//! # Responsibilities
//! - Try each configured backend instance in order
//! - Return the first 200 response, rewritten when requested
//! - Report exhaustion when every instance fails
//!
//! # Design Decisions
//! - First-success policy: the fan-out stops at the first 200 and a
//!   transport error is treated the same as a non-200 status
//! - No health tracking, circuit breaking, or backoff; every request
//!   restarts from the first instance
//! - The query string is re-serialized from decoded pairs, matching the
//!   links the aggregator backends expect

use axum::http::{header, HeaderValue, StatusCode};
use url::form_urlencoded;

use crate::rewrite::ContentRewriter;
use crate::upstream::BackendsExhausted;

/// Query key whose presence requests embedded-image rewriting.
pub const IMAGE_PROXY_KEY: &str = "_image_proxy";

/// Query key carrying the referer to embed in rewritten image links.
pub const IMAGE_PROXY_REFERER_KEY: &str = "_image_proxy_referer";

/// The first successful backend response, ready to send to the client.
#[derive(Debug)]
pub struct ForwardOutcome {
    pub body: String,
    pub content_type: Option<HeaderValue>,
}

/// Fans feed requests out across the configured backend instances.
pub struct Forwarder {
    client: reqwest::Client,
    instances: Vec<String>,
    rewriter: ContentRewriter,
}

impl Forwarder {
    pub fn new(client: reqwest::Client, instances: Vec<String>) -> Self {
        Self {
            client,
            instances,
            rewriter: ContentRewriter::new(),
        }
    }

    /// Forward `path` + `raw_query` to the first backend instance that
    /// answers 200.
    ///
    /// `external_base` is the scheme://host[:port] the client reached
    /// us under; rewritten image links point back at it.
    pub async fn forward(
        &self,
        path: &str,
        raw_query: Option<&str>,
        external_base: &str,
    ) -> Result<ForwardOutcome, BackendsExhausted> {
        let path = normalize_path(path);
        let pairs = parse_query(raw_query);
        let query_suffix = if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", serialize_pairs(&pairs))
        };

        for instance in &self.instances {
            let full_url = format!("{instance}{path}{query_suffix}");
            let response = match self.client.get(&full_url).send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(url = %full_url, error = %e, "backend request failed");
                    continue;
                }
            };

            let status = response.status();
            if status != StatusCode::OK {
                tracing::warn!(url = %full_url, status = %status, "non-200 from backend instance");
                continue;
            }

            let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(url = %full_url, error = %e, "failed to read backend body");
                    continue;
                }
            };

            let body = if pairs.iter().any(|(k, _)| k == IMAGE_PROXY_KEY) {
                let referer = pairs
                    .iter()
                    .find(|(k, _)| k == IMAGE_PROXY_REFERER_KEY)
                    .map(|(_, v)| v.as_str())
                    .unwrap_or("");
                self.rewriter.rewrite(&text, external_base, referer)
            } else {
                text
            };

            return Ok(ForwardOutcome { body, content_type });
        }

        Err(BackendsExhausted)
    }
}

/// Ensure the forwarded path carries a leading separator.
fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn parse_query(raw_query: Option<&str>) -> Vec<(String, String)> {
    raw_query
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Join decoded pairs back into a query string. Values are joined as
/// `k=v` without re-encoding; valueless keys serialize as `k=`.
fn serialize_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("feed/xyz"), "/feed/xyz");
        assert_eq!(normalize_path("/feed/xyz"), "/feed/xyz");
    }

    #[test]
    fn test_query_roundtrip_keeps_order() {
        let pairs = parse_query(Some("a=1&b=2&_image_proxy="));
        assert_eq!(serialize_pairs(&pairs), "a=1&b=2&_image_proxy=");
    }

    #[test]
    fn test_query_decodes_before_serializing() {
        let pairs = parse_query(Some("q=a%20b"));
        assert_eq!(serialize_pairs(&pairs), "q=a b");
    }

    #[test]
    fn test_empty_query() {
        assert!(parse_query(None).is_empty());
        assert!(parse_query(Some("")).is_empty());
    }
}
