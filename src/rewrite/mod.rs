//! Embedded image link rewriting.
//!
//! # Responsibilities
//! - Find `<img src="...">` occurrences in backend content
//! - Find the HTML-entity-escaped form `&lt;img src=&quot;...&quot;`
//! - Point each source URL at the image proxy endpoint
//!
//! # Design Decisions
//! - Deliberately a two-pass text substitution, not a markup parser:
//!   the calling content is feed-aggregator output with a narrow known
//!   shape, and compatibility requires exactly these two patterns
//! - Single-quoted or attribute-reordered tags are left untouched
//! - The original source URL is inserted verbatim, never re-encoded

use regex::{Captures, Regex};

/// Rewrites embedded image sources into image-proxy links.
pub struct ContentRewriter {
    plain: Regex,
    escaped: Regex,
}

impl ContentRewriter {
    pub fn new() -> Self {
        Self {
            plain: Regex::new(r#"<img\s+src="([^"]+)""#).expect("hard-coded pattern"),
            escaped: Regex::new(r"&lt;img\s+src=&quot;(.+?)&quot;").expect("hard-coded pattern"),
        }
    }

    /// Replace every matched image source with a link through
    /// `{base_url}/image`, carrying the original URL and `referer` as
    /// query parameters.
    ///
    /// In the entity-escaped pass the injected `&` characters (and any
    /// contributed by `base_url` or `referer`) become `&amp;`, since the
    /// surrounding context is itself escaped markup.
    pub fn rewrite(&self, content: &str, base_url: &str, referer: &str) -> String {
        let head = format!("{base_url}/image?url=");
        let tail = format!("&referer={referer}");

        let first = self.plain.replace_all(content, |caps: &Captures| {
            format!(r#"<img src="{head}{}{tail}""#, &caps[1])
        });

        let head_escaped = head.replace('&', "&amp;");
        let tail_escaped = tail.replace('&', "&amp;");
        let second = self.escaped.replace_all(&first, |caps: &Captures| {
            format!(
                "&lt;img src=&quot;{head_escaped}{}{tail_escaped}&quot;",
                &caps[1]
            )
        });

        second.into_owned()
    }
}

impl Default for ContentRewriter {
    fn default() -> Self {
        Self::new()
    }
}
