//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::auth_handler::{AuthenticationResponse, LoginRequest};
use crate::handlers::customer_handler::{RegisterRequest, UpdateCustomerRequest};
use crate::handlers::health_handler::{HealthResponse, ServiceHealth, ServiceStatus};
use domain::{CustomerIdentity, Gender};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth_handler::login,
        crate::handlers::customer_handler::register,
        crate::handlers::customer_handler::list_customers,
        crate::handlers::customer_handler::get_current_customer,
        crate::handlers::customer_handler::get_customer,
        crate::handlers::customer_handler::update_customer,
        crate::handlers::customer_handler::delete_customer,
        crate::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            LoginRequest,
            RegisterRequest,
            UpdateCustomerRequest,
            AuthenticationResponse,
            CustomerIdentity,
            Gender,
            HealthResponse,
            ServiceStatus,
            ServiceHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Session token issuance"),
        (name = "Customers", description = "Customer registration, lookup and profile maintenance"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
