//! Application state for dependency injection.

use std::sync::Arc;

use auth_service_lib::service::{AuthService, CustomerService};
use auth_service_lib::AuthComponents;
use common::AccessPolicyConfig;

use crate::config::GatewayConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub customer_service: Arc<dyn CustomerService>,
    pub access: Arc<AccessPolicyConfig>,
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(components: AuthComponents, config: GatewayConfig) -> Self {
        Self {
            auth_service: components.auth_service,
            customer_service: components.customer_service,
            access: Arc::new(config.access.clone()),
            config,
        }
    }
}
