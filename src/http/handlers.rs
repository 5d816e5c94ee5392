//! Request handlers for the relay's two endpoints.
//!
//! # Responsibilities
//! - `/image`: cache lookup → origin fetch → cache store → response
//! - `/rsshub/{*path}`: backend fan-out with optional image rewriting
//!
//! # Design Decisions
//! - Missing or empty `url` on `/image` is rejected with 400 before any
//!   fetch is attempted
//! - Only 200 origin responses are cached; every other status passes
//!   through untouched
//! - Fan-out exhaustion answers 200 with a JSON error body; existing
//!   callers detect this failure by payload shape, not status code

use axum::body::Body;
use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::Deserialize;

use crate::cache::CachedResponse;
use crate::http::base_url::external_base_url;
use crate::http::server::AppState;

/// Query parameters accepted by `/image`.
#[derive(Debug, Deserialize)]
pub struct ImageParams {
    #[serde(default)]
    url: String,
    referer: Option<String>,
}

/// `GET /image?url=…&referer=…`
pub async fn image_handler(
    State(state): State<AppState>,
    Query(params): Query<ImageParams>,
    headers: HeaderMap,
) -> Response {
    if params.url.is_empty() {
        tracing::warn!("image request without url parameter");
        return (StatusCode::BAD_REQUEST, "missing url parameter").into_response();
    }

    if let Some(cached) = state.cache.get(&params.url) {
        tracing::debug!(url = %params.url, "cache hit");
        return assemble_response(StatusCode::OK, cached.headers, cached.body);
    }

    let referer = state.fetcher.resolve_referer(params.referer.as_deref());
    let incoming_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());
    let user_agent = state.fetcher.resolve_user_agent(incoming_agent);

    tracing::info!(url = %params.url, referer = %referer, "proxying image request");

    let fetched = match state.fetcher.fetch(&params.url, referer, user_agent).await {
        Ok(fetched) => fetched,
        Err(e) => {
            tracing::error!(url = %params.url, error = %e, "origin fetch failed");
            return (StatusCode::BAD_GATEWAY, "origin request failed").into_response();
        }
    };

    // The body is fully buffered, so the origin's framing headers no
    // longer apply; content-length is set to the exact byte count.
    let mut response_headers = fetched.headers;
    response_headers.remove(header::TRANSFER_ENCODING);
    response_headers.remove(header::CONNECTION);
    response_headers.insert(header::CONTENT_LENGTH, HeaderValue::from(fetched.body.len()));

    if fetched.status == StatusCode::OK {
        state.cache.put(
            params.url.clone(),
            CachedResponse {
                headers: response_headers.clone(),
                body: fetched.body.clone(),
            },
        );
    }

    assemble_response(fetched.status, response_headers, fetched.body)
}

/// `GET /rsshub/{*path}`
pub async fn feed_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(raw_query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let base = external_base_url(&headers);

    match state
        .forwarder
        .forward(&path, raw_query.as_deref(), &base)
        .await
    {
        Ok(outcome) => {
            let mut response = Response::new(Body::from(outcome.body));
            if let Some(content_type) = outcome.content_type {
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, content_type);
            }
            response
        }
        Err(e) => {
            tracing::warn!(path = %path, "{}", e);
            Json(serde_json::json!({
                "error": "No website instance returned a 200 status code"
            }))
            .into_response()
        }
    }
}

fn assemble_response(status: StatusCode, headers: HeaderMap, body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
