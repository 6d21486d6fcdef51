//! Authentication service - verifies credentials and issues session tokens.
//!
//! Uses the domain Password value object for hashing and verification.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::{bounded, normalize_identifier};
use super::token::{SessionClaims, SessionToken, TokenIssuer};
use crate::config::AuthServiceConfig;
use crate::repository::{CustomerDraft, CustomerRepository};
use common::{AppError, AppResult};
use domain::{Credential, CustomerIdentity, NewCustomer, Password};

/// A session token paired with the identity it was issued for.
///
/// Only the issuer can build one, and only after the secret was verified.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    token: SessionToken,
    customer: CustomerIdentity,
}

impl AuthenticationResult {
    pub(crate) fn new(token: SessionToken, customer: CustomerIdentity) -> Self {
        Self { token, customer }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn customer(&self) -> &CustomerIdentity {
        &self.customer
    }

    pub fn into_parts(self) -> (SessionToken, CustomerIdentity) {
        (self.token, self.customer)
    }
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify a credential and issue a session token.
    ///
    /// A wrong identifier and a wrong secret both fail with
    /// `AppError::InvalidCredentials`.
    async fn authenticate(&self, credential: Credential) -> AppResult<AuthenticationResult>;

    /// Register a new customer and log them in.
    async fn register(&self, new_customer: NewCustomer) -> AppResult<AuthenticationResult>;

    /// Verify a session token and extract its claims.
    fn verify_token(&self, token: &str) -> AppResult<SessionClaims>;
}

/// Concrete implementation of AuthService over a customer repository.
pub struct Authenticator {
    customers: Arc<dyn CustomerRepository>,
    tokens: TokenIssuer,
    dummy_password: Password,
    store_timeout: Duration,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        config: &AuthServiceConfig,
    ) -> AppResult<Self> {
        Ok(Self {
            customers,
            tokens: TokenIssuer::new(&config.jwt)?,
            dummy_password: Password::dummy()?,
            store_timeout: config.store_timeout(),
        })
    }

    fn issue(&self, customer: CustomerIdentity) -> AppResult<AuthenticationResult> {
        let token = self.tokens.issue(&customer)?;
        Ok(AuthenticationResult::new(token, customer))
    }

    fn reject(&self, identifier: &str) -> AppError {
        tracing::info!(
            target: "audit",
            event = "authentication",
            outcome = "failure",
            identifier = %identifier,
            "Authentication rejected"
        );
        AppError::InvalidCredentials
    }
}

/// Verify a secret against a stored hash off the async runtime.
async fn verify_secret(hash: Password, secret: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || hash.verify(&secret))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))
}

async fn hash_secret(secret: String) -> AppResult<Password> {
    tokio::task::spawn_blocking(move || Password::new(&secret))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

#[async_trait]
impl AuthService for Authenticator {
    async fn authenticate(&self, credential: Credential) -> AppResult<AuthenticationResult> {
        let identifier = normalize_identifier(credential.identifier());

        // Blank identifiers go through the same dummy verification as
        // unknown ones so neither is distinguishable by timing.
        let customer = if credential.is_blank() {
            None
        } else {
            bounded(
                self.store_timeout,
                self.customers.find_by_email(&identifier),
            )
            .await?
        };

        let stored = match &customer {
            Some(customer) => Password::from_hash(customer.password_hash.clone()),
            None => self.dummy_password.clone(),
        };
        let secret_valid = verify_secret(stored, credential.secret().to_string()).await?;

        let customer = match customer {
            Some(customer) if secret_valid => customer,
            _ => return Err(self.reject(&identifier)),
        };

        let result = self.issue(customer.identity())?;
        tracing::info!(
            target: "audit",
            event = "authentication",
            outcome = "success",
            customer_id = %customer.id,
            expires_at = %result.token().expires_at(),
            "Customer authenticated"
        );
        Ok(result)
    }

    async fn register(&self, new_customer: NewCustomer) -> AppResult<AuthenticationResult> {
        new_customer.validate()?;
        let email = normalize_identifier(&new_customer.email);

        if bounded(self.store_timeout, self.customers.find_by_email(&email))
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Customer"));
        }

        let password_hash = hash_secret(new_customer.password).await?.into_string();

        let draft = CustomerDraft {
            name: new_customer.name.trim().to_string(),
            email,
            password_hash,
            age: new_customer.age,
            gender: new_customer.gender,
        };
        let customer = bounded(self.store_timeout, self.customers.create(draft)).await?;

        tracing::info!(
            target: "audit",
            event = "registration",
            customer_id = %customer.id,
            "Customer registered"
        );
        self.issue(customer.identity())
    }

    fn verify_token(&self, token: &str) -> AppResult<SessionClaims> {
        self.tokens.verify(token)
    }
}
