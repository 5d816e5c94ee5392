//! Origin image fetching.
//!
//! # Responsibilities
//! - Issue exactly one GET to the caller-specified URL
//! - Inject the resolved referer and user-agent headers
//! - Buffer the full response body
//!
//! # Design Decisions
//! - Header resolution order: per-request value → configured default →
//!   empty; the incoming user-agent is only used when no override is
//!   configured
//! - The fetcher never touches the cache; hit/store decisions belong
//!   to the image handler

use axum::http::{HeaderMap, StatusCode};
use bytes::Bytes;
use reqwest::header;

use crate::config::UpstreamConfig;
use crate::upstream::FetchError;

/// A fully buffered origin response.
#[derive(Debug)]
pub struct FetchedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Performs header-rewriting origin fetches over the shared client.
pub struct OriginFetcher {
    client: reqwest::Client,
    default_referer: String,
    user_agent_override: Option<String>,
}

impl OriginFetcher {
    pub fn new(client: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            default_referer: config.default_referer.clone(),
            user_agent_override: config.user_agent_override.clone(),
        }
    }

    /// Resolve the referer to send: per-request value, then the
    /// configured default, then empty.
    pub fn resolve_referer<'a>(&'a self, param: Option<&'a str>) -> &'a str {
        param.unwrap_or(&self.default_referer)
    }

    /// Resolve the user-agent to send: configured override, then the
    /// incoming client's own user-agent, then empty.
    pub fn resolve_user_agent<'a>(&'a self, incoming: Option<&'a str>) -> &'a str {
        self.user_agent_override
            .as_deref()
            .or(incoming)
            .unwrap_or("")
    }

    /// GET `url` with the given headers and buffer the whole body.
    ///
    /// Transport failures surface as [`FetchError`]; non-success status
    /// codes are not errors here, the caller decides what to do with
    /// them.
    pub async fn fetch(
        &self,
        url: &str,
        referer: &str,
        user_agent: &str,
    ) -> Result<FetchedResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .header(header::REFERER, referer)
            .header(header::USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|source| FetchError {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|source| FetchError {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchedResponse {
            status,
            headers,
            body,
        })
    }
}
