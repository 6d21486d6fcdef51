//! Auth Service Library
//!
//! This crate is the authentication issuer: it verifies customer
//! credentials against the credential store and issues session tokens.
//! The gateway embeds it in-process.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use crate::config::AuthServiceConfig;
use crate::repository::{CustomerRepository, CustomerStore, InMemoryCustomerStore};
use crate::service::{AuthService, Authenticator, CustomerManager, CustomerService};
use common::AppResult;

/// The services the gateway needs, wired to one credential store.
#[derive(Clone)]
pub struct AuthComponents {
    pub auth_service: Arc<dyn AuthService>,
    pub customer_service: Arc<dyn CustomerService>,
}

impl AuthComponents {
    /// Wire the services over an existing repository.
    pub fn with_repository(
        customers: Arc<dyn CustomerRepository>,
        config: &AuthServiceConfig,
    ) -> AppResult<Self> {
        Ok(Self {
            auth_service: Arc::new(Authenticator::new(customers.clone(), config)?),
            customer_service: Arc::new(CustomerManager::new(customers, config)),
        })
    }

    /// Connect to the configured store and wire the services.
    pub async fn connect(config: &AuthServiceConfig) -> AppResult<Self> {
        let customers = connect_store(config).await?;
        Self::with_repository(customers, config)
    }
}

/// Open the credential store named by the configuration.
///
/// Uses Postgres when `DATABASE_URL` is set, applying pending migrations
/// first. Otherwise an empty in-memory store.
pub async fn connect_store(config: &AuthServiceConfig) -> AppResult<Arc<dyn CustomerRepository>> {
    match &config.database_url {
        Some(url) => {
            let connection = infra::connect(url, config.store_timeout()).await?;
            Ok(Arc::new(CustomerStore::new(connection)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory credential store");
            Ok(Arc::new(InMemoryCustomerStore::new()))
        }
    }
}
