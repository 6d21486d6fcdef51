//! Authentication handlers.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderValue},
    response::Json,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use auth_service_lib::service::AuthenticationResult;
use common::{AppError, AppResult};
use domain::{Credential, CustomerIdentity};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Login request.
///
/// Only oversized fields are rejected here. Blank fields fail authentication
/// like any other wrong credential.
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Login identifier (the customer's email)
    #[validate(length(max = 254, message = "Username must be at most 254 characters"))]
    #[schema(example = "ada@example.com", max_length = 254)]
    pub username: String,
    /// Customer password
    #[validate(length(max = 128, message = "Password must be at most 128 characters"))]
    #[schema(example = "password", max_length = 128)]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Session token and the identity it was issued for.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthenticationResponse {
    /// Signed session token
    pub token: String,
    /// Identity of the authenticated customer
    #[serde(rename = "customerDTO")]
    pub customer_dto: CustomerIdentity,
}

/// Response headers and body for a freshly issued session. The token is
/// repeated in the `Authorization` header, where the browser client reads it.
pub type SessionResponse = ([(axum::http::HeaderName, HeaderValue); 1], Json<AuthenticationResponse>);

pub(crate) fn session_response(result: AuthenticationResult) -> AppResult<SessionResponse> {
    let (token, customer) = result.into_parts();
    let header = HeaderValue::from_str(token.as_str())
        .map_err(|e| AppError::internal(format!("Token is not a valid header value: {}", e)))?;

    Ok((
        [(AUTHORIZATION, header)],
        Json(AuthenticationResponse {
            token: token.into_string(),
            customer_dto: customer,
        }),
    ))
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Login and get a session token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthenticationResponse,
            headers(("Authorization" = String, description = "Session token"))),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Invalid credentials"),
        (status = 503, description = "Credential store unavailable, retry later")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<SessionResponse> {
    let result = state
        .auth_service
        .authenticate(Credential::new(payload.username, payload.password))
        .await?;

    session_response(result)
}
