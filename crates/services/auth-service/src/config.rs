//! Auth service configuration.

use std::env;
use std::time::Duration;

use common::{env_or, AppError, AppResult, JwtConfig};
use domain::DEFAULT_JWT_EXPIRATION_HOURS;

/// Default upper bound for a single credential store call
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5000;

/// Auth service configuration.
#[derive(Clone)]
pub struct AuthServiceConfig {
    /// Session token signing settings
    pub jwt: JwtConfig,
    /// Postgres URL. When unset the in-memory store is used.
    pub database_url: Option<String>,
    /// Timeout applied around every credential store call
    pub store_timeout_ms: u64,
}

impl std::fmt::Debug for AuthServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceConfig")
            .field("jwt", &self.jwt)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("store_timeout_ms", &self.store_timeout_ms)
            .finish()
    }
}

impl AuthServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Fails when `JWT_SECRET` is missing or shorter than the minimum length,
    /// or when a numeric setting is present but does not parse.
    pub fn from_env() -> AppResult<Self> {
        let secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::internal("JWT_SECRET must be set (minimum 32 characters)"))?;

        let jwt = JwtConfig {
            secret,
            expiration_hours: env_or("JWT_EXPIRATION_HOURS", DEFAULT_JWT_EXPIRATION_HOURS)?,
            leeway_seconds: env_or("JWT_LEEWAY_SECONDS", 0)?,
        };
        jwt.validate()?;

        Ok(Self {
            jwt,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            store_timeout_ms: env_or("STORE_TIMEOUT_MS", DEFAULT_STORE_TIMEOUT_MS)?,
        })
    }

    /// Store timeout as a Duration.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            database_url: None,
            store_timeout_ms: DEFAULT_STORE_TIMEOUT_MS,
        }
    }
}
