//! Route configuration.

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{auth_routes, customer_routes, health_routes};
use crate::middleware::{auth_middleware, create_cors_layer};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
///
/// Layer order, outermost first: CORS (answers preflights), tracing, then
/// the access policy.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes())
        .nest("/customers", customer_routes());

    Router::new()
        .nest("/api/v1", api)
        .nest("/health", health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(&state.config.cors))
        .with_state(state)
}
