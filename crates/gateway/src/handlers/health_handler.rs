//! Health check handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub services: ServiceStatus,
}

/// Individual service status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    pub credential_store: ServiceHealth,
}

/// Service health with optional error message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Health check endpoint - verifies the credential store answers.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "All dependencies healthy", body = HealthResponse),
        (status = 503, description = "Credential store unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Response {
    let store_health = match state.customer_service.health_check().await {
        Ok(()) => ServiceHealth {
            status: "healthy".to_string(),
            error: None,
        },
        Err(e) => ServiceHealth {
            status: "unhealthy".to_string(),
            error: Some(e.user_message()),
        },
    };

    let healthy = store_health.error.is_none();

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        services: ServiceStatus {
            credential_store: store_health,
        },
    };

    if healthy {
        (StatusCode::OK, Json(response)).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
    }
}
