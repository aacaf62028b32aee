//! Security response headers.
//!
//! Every response gets a Content-Security-Policy, `nosniff`, frame denial
//! and a referrer policy.

use axum::http::HeaderValue;
use axum::http::header::{self, HeaderName};
use tower::ServiceBuilder;
use tower::layer::util::{Identity, Stack};
use tower_http::set_header::SetResponseHeaderLayer;

/// Content-Security-Policy header value.
///
/// Pages carry no scripts; component styles are inline.
const CSP: &str = "default-src 'self'; \
                   script-src 'self'; \
                   style-src 'self' 'unsafe-inline'; \
                   font-src 'self' data:; \
                   img-src 'self' data: https:; \
                   connect-src 'self'; \
                   frame-ancestors 'none'";

type HeaderLayer = SetResponseHeaderLayer<HeaderValue>;

/// All security header layers, outermost first.
pub(crate) type SecurityLayers =
    Stack<HeaderLayer, Stack<HeaderLayer, Stack<HeaderLayer, Stack<HeaderLayer, Identity>>>>;

/// Build the security header layers.
pub(crate) fn layers() -> ServiceBuilder<SecurityLayers> {
    ServiceBuilder::new()
        .layer(overriding(header::CONTENT_SECURITY_POLICY, CSP))
        .layer(overriding(header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .layer(overriding(header::X_FRAME_OPTIONS, "DENY"))
        .layer(overriding(
            header::REFERRER_POLICY,
            "strict-origin-when-cross-origin",
        ))
}

fn overriding(name: HeaderName, value: &'static str) -> HeaderLayer {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}
