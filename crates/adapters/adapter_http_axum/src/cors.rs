//! Cross-origin policy: a fixed allow-list of origins.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Build a CORS layer allowing only `allowed_origins`.
///
/// A single `"*"` entry allows any origin. Entries that are not valid header
/// values are skipped with a warning.
pub fn layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.len() == 1 && allowed_origins[0] == "*" {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed_origins.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| tracing::warn!(%origin, "ignoring invalid CORS origin"))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
