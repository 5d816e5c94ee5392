//! External base-URL derivation.
//!
//! The relay is expected to sit behind a reverse proxy, so the
//! `X-Forwarded-Proto` / `X-Forwarded-Host` / `X-Forwarded-Port`
//! headers take precedence over the request's own connection info when
//! building links the external client must be able to follow.

use axum::http::{header, HeaderMap};

/// Compute `scheme://host[:port]` as seen by the external client.
///
/// Falls back to the request's `Host` header (and plain http) when no
/// forwarded headers are present. The port is omitted when it equals
/// the default for the chosen scheme.
pub fn external_base_url(headers: &HeaderMap) -> String {
    let proto = header_str(headers, "x-forwarded-proto").unwrap_or("http");

    // Each component falls back independently to the request's own view.
    let own_host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
    let (own_host, own_port) = split_host_port(own_host.unwrap_or("localhost"));

    let host = header_str(headers, "x-forwarded-host")
        .map(|h| split_host_port(h).0)
        .unwrap_or(own_host);

    let port = header_str(headers, "x-forwarded-port").or(own_port);

    match port {
        Some(port) if !is_default_port(proto, port) => format!("{proto}://{host}:{port}"),
        _ => format!("{proto}://{host}"),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Split a `host[:port]` value. Ports are only recognized when the
/// suffix is all digits, which leaves bracketed IPv6 literals intact.
fn split_host_port(raw: &str) -> (&str, Option<&str>) {
    match raw.rsplit_once(':') {
        Some((host, port))
            if !host.is_empty() && !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) =>
        {
            (host, Some(port))
        }
        _ => (raw, None),
    }
}

fn is_default_port(proto: &str, port: &str) -> bool {
    matches!((proto, port), ("http", "80") | ("https", "443"))
}
