//! CORS layer built from an explicit origin list.

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use common::CorsConfig;

/// Creates the CORS layer. A `*` entry and origins that fail to parse as
/// header values are skipped with a warning.
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .effective_origins()
        .iter()
        .filter(|origin| {
            let wildcard = origin.as_str() == "*";
            if wildcard {
                tracing::warn!("Ignoring wildcard CORS origin");
            }
            !wildcard
        })
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    tracing::debug!(
        origins = ?config.effective_origins(),
        allow_credentials = config.allow_credentials,
        "Configured CORS"
    );

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
        .expose_headers([AUTHORIZATION])
        .allow_credentials(config.allow_credentials)
        .max_age(config.max_age())
}
