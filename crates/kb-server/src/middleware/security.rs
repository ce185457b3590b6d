//! Response headers that lock the shell page down to its own origin.
//!
//! The only third-party origin is the MathJax CDN; the client script talks
//! to `/api/*` on the same origin.

use axum::http::HeaderValue;
use axum::http::header::{HeaderName, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS};
use tower_http::set_header::SetResponseHeaderLayer;

/// Origin MathJax is loaded from.
pub(crate) const MATHJAX_ORIGIN: &str = "https://cdn.jsdelivr.net";

const CSP: &str = concat!(
    "default-src 'self'; ",
    "script-src 'self' https://cdn.jsdelivr.net; ",
    "style-src 'self' 'unsafe-inline'; ",
    "font-src 'self' data: https://cdn.jsdelivr.net; ",
    "img-src 'self' data:; ",
    "connect-src 'self'; ",
    "frame-ancestors 'none'"
);

fn fixed(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

pub(crate) fn csp_layer() -> SetResponseHeaderLayer<HeaderValue> {
    fixed(HeaderName::from_static("content-security-policy"), CSP)
}

pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    fixed(X_CONTENT_TYPE_OPTIONS, "nosniff")
}

pub(crate) fn frame_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    fixed(X_FRAME_OPTIONS, "DENY")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_allows_mathjax_only() {
        assert!(CSP.contains(&format!("script-src 'self' {MATHJAX_ORIGIN};")));
        assert!(CSP.contains("connect-src 'self';"));
        assert!(CSP.contains("frame-ancestors 'none'"));
    }
}
