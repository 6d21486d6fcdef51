//! HTTP request handlers.

pub mod auth_handler;
pub mod customer_handler;
pub mod health_handler;

pub use auth_handler::auth_routes;
pub use customer_handler::customer_routes;
pub use health_handler::health_routes;
