//! Customer handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{CustomerIdentity, CustomerUpdate, Gender, NewCustomer};

use super::auth_handler::{session_response, AuthenticationResponse, SessionResponse};
use crate::extractors::ValidatedJson;
use crate::middleware::{require_self_or_admin, CurrentCustomer};
use crate::state::AppState;

/// Customer registration request with validation
#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 50, message = "Name must be between 1 and 50 characters"))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Email address, also the login identifier
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Password (4 to 20 characters)
    #[validate(length(min = 4, max = 20, message = "Password must be between 4 and 20 characters"))]
    #[schema(example = "password", min_length = 4, max_length = 20)]
    pub password: String,
    /// Age in years
    #[validate(range(min = 16, max = 100, message = "Age must be between 16 and 100"))]
    #[schema(example = 36)]
    pub age: i32,
    pub gender: Gender,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("age", &self.age)
            .field("gender", &self.gender)
            .finish()
    }
}

impl From<RegisterRequest> for NewCustomer {
    fn from(req: RegisterRequest) -> Self {
        NewCustomer {
            name: req.name,
            email: req.email,
            password: req.password,
            age: req.age,
            gender: req.gender,
        }
    }
}

/// Profile changes. Omitted fields keep their current value.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be between 1 and 50 characters"))]
    #[schema(example = "Ada King")]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada.king@example.com")]
    pub email: Option<String>,
    #[validate(range(min = 16, max = 100, message = "Age must be between 16 and 100"))]
    #[schema(example = 37)]
    pub age: Option<i32>,
}

impl From<UpdateCustomerRequest> for CustomerUpdate {
    fn from(req: UpdateCustomerRequest) -> Self {
        CustomerUpdate {
            name: req.name,
            email: req.email,
            age: req.age,
        }
    }
}

/// Create customer routes
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(register))
        .route("/me", get(get_current_customer))
        .route(
            "/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

/// Register a new customer and log them in
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    tag = "Customers",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Customer registered", body = AuthenticationResponse,
            headers(("Authorization" = String, description = "Session token"))),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered"),
        (status = 503, description = "Credential store unavailable, retry later")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, SessionResponse)> {
    let result = state.auth_service.register(payload.into()).await?;
    Ok((StatusCode::CREATED, session_response(result)?))
}

/// List all customers
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    tag = "Customers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All customers", body = Vec<CustomerIdentity>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_customers(State(state): State<AppState>) -> AppResult<Json<Vec<CustomerIdentity>>> {
    Ok(Json(state.customer_service.list_customers().await?))
}

/// Get the authenticated customer
#[utoipa::path(
    get,
    path = "/api/v1/customers/me",
    tag = "Customers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current customer", body = CustomerIdentity),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_customer(
    Extension(current_customer): Extension<CurrentCustomer>,
    State(state): State<AppState>,
) -> AppResult<Json<CustomerIdentity>> {
    let customer = state
        .customer_service
        .get_customer(current_customer.id)
        .await?;
    Ok(Json(customer))
}

/// Get customer by ID
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer", body = CustomerIdentity),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CustomerIdentity>> {
    Ok(Json(state.customer_service.get_customer(id).await?))
}

/// Update a customer's profile (own profile, or any profile for admins)
#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Customer ID")
    ),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = CustomerIdentity),
        (status = 400, description = "Validation error or no changes"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Can only update own profile unless admin"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_customer(
    Extension(current_customer): Extension<CurrentCustomer>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCustomerRequest>,
) -> AppResult<Json<CustomerIdentity>> {
    require_self_or_admin(&current_customer, id)?;

    let customer = state
        .customer_service
        .update_customer(id, payload.into())
        .await?;
    Ok(Json(customer))
}

/// Delete a customer (own account, or any account for admins)
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Customer ID")
    ),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Can only delete own account unless admin"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn delete_customer(
    Extension(current_customer): Extension<CurrentCustomer>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_self_or_admin(&current_customer, id)?;

    state.customer_service.delete_customer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
