//! Middleware for authentication and CORS.

mod auth;
mod cors;

pub use auth::{auth_middleware, require_self_or_admin, CurrentCustomer};
pub use cors::create_cors_layer;
