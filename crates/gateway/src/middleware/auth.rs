//! Authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{BEARER_TOKEN_PREFIX, ROLE_ADMIN};

use crate::state::AppState;

/// Current authenticated customer extracted from the session token.
#[derive(Debug, Clone)]
pub struct CurrentCustomer {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

impl CurrentCustomer {
    /// Check if the customer has the admin role.
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ROLE_ADMIN)
    }
}

/// Allow a change to customer `id` only by that customer or an admin.
pub fn require_self_or_admin(customer: &CurrentCustomer, id: Uuid) -> AppResult<()> {
    if customer.id == id || customer.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Enforces the access policy: requests to public routes pass through,
/// everything else needs a valid bearer token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if state
        .access
        .is_public(request.method().as_str(), request.uri().path())
    {
        return Ok(next.run(request).await);
    }

    let token = extract_token(&request)?;
    let claims = state.auth_service.verify_token(token)?;

    let current_customer = CurrentCustomer {
        id: claims.cid,
        username: claims.sub,
        roles: claims.scopes,
    };
    request.extensions_mut().insert(current_customer);

    Ok(next.run(request).await)
}

/// Extract bearer token from Authorization header.
fn extract_token(request: &Request<Body>) -> AppResult<&str> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)
}
