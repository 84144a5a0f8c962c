//! CORS policies.

use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Permissive policy for local development: every origin, method and header
/// is accepted and credentials are allowed.
///
/// Wildcards cannot be combined with credentials, so the request's own
/// origin, method and headers are mirrored back instead.
pub fn permissive_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Explicit allow-list policy. Unparseable origins are skipped with a warning.
pub fn cors_layer_with_origins(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Picks the allow-list policy when origins are configured, the permissive one otherwise.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        tracing::warn!("CORS allows every origin; configure an allow-list before exposing this service");
        permissive_cors_layer()
    } else {
        cors_layer_with_origins(allowed_origins)
    }
}
