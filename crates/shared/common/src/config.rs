//! Shared configuration structures.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use domain::{DEFAULT_JWT_EXPIRATION_HOURS, MAX_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH};

use crate::error::{AppError, AppResult};

/// JWT configuration for session tokens.
#[derive(Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    #[serde(skip_serializing)]
    pub secret: String,
    pub expiration_hours: i64,
    /// Clock skew tolerated when checking expiry
    pub leeway_seconds: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expiration_hours", &self.expiration_hours)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl JwtConfig {
    /// Reject secrets too short to sign tokens safely and lifetimes outside
    /// `1..=MAX_JWT_EXPIRATION_HOURS`.
    pub fn validate(&self) -> AppResult<()> {
        if self.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::internal(format!(
                "JWT secret must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        if !(1..=MAX_JWT_EXPIRATION_HOURS).contains(&self.expiration_hours) {
            return Err(AppError::internal(format!(
                "JWT expiration must be between 1 and {} hours",
                MAX_JWT_EXPIRATION_HOURS
            )));
        }
        Ok(())
    }

    /// Get JWT secret as bytes.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            leeway_seconds: 0,
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
///
/// Origins are enumerated; there is no wildcard mode.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins. Empty means the local development origins.
    pub allowed_origins: Vec<String>,
    /// Maximum age for preflight responses in seconds
    pub max_age_seconds: u64,
    /// Whether browsers may send credentials
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
            allow_credentials: false,
        }
    }
}

impl CorsConfig {
    /// Local development origins (Vite and CRA defaults).
    pub const LOCALHOST_ORIGINS: &'static [&'static str] = &[
        "http://localhost:3000",
        "http://localhost:5173",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
    ];

    /// Returns the preflight max age as a Duration.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Reject the `*` wildcard. Origins must be listed one by one.
    pub fn validate(&self) -> AppResult<()> {
        if self.allowed_origins.iter().any(|origin| origin == "*") {
            return Err(AppError::validation(
                "CORS_ORIGINS must list explicit origins; '*' is not allowed",
            ));
        }
        Ok(())
    }

    /// Origins in effect after applying the development default.
    pub fn effective_origins(&self) -> Vec<String> {
        if self.allowed_origins.is_empty() {
            Self::LOCALHOST_ORIGINS.iter().map(|o| o.to_string()).collect()
        } else {
            self.allowed_origins.clone()
        }
    }
}

/// A route reachable without a session token.
///
/// Matches when the method is equal (or the entry has no method) and the
/// request path equals `path`. A path ending in `/*` also covers everything
/// below it, so `/swagger-ui/*` matches `/swagger-ui` and `/swagger-ui/x.js`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PublicRoute {
    pub method: Option<String>,
    pub path: String,
}

impl PublicRoute {
    pub fn new(method: Option<&str>, path: impl Into<String>) -> Self {
        Self {
            method: method.map(|m| m.to_ascii_uppercase()),
            path: path.into(),
        }
    }

    /// Parse `"POST /api/v1/auth/login"` or `"/health"`.
    pub fn parse(entry: &str) -> AppResult<Self> {
        let mut parts = entry.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(path), None, None) if path.starts_with('/') => Ok(Self::new(None, path)),
            (Some(method), Some(path), None) if path.starts_with('/') => {
                Ok(Self::new(Some(method), path))
            }
            _ => Err(AppError::validation(format!(
                "Invalid public route entry '{}'",
                entry
            ))),
        }
    }

    pub fn matches(&self, method: &str, path: &str) -> bool {
        if let Some(expected) = &self.method {
            if !expected.eq_ignore_ascii_case(method) {
                return false;
            }
        }

        match self.path.strip_suffix("/*") {
            Some(base) => path
                .strip_prefix(base)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
            None => path.trim_end_matches('/') == self.path.trim_end_matches('/'),
        }
    }
}

/// Which routes skip bearer-token authentication. Everything else requires it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccessPolicyConfig {
    pub public_routes: Vec<PublicRoute>,
}

impl Default for AccessPolicyConfig {
    fn default() -> Self {
        Self {
            public_routes: vec![
                PublicRoute::new(Some("POST"), "/api/v1/auth/login"),
                PublicRoute::new(Some("POST"), "/api/v1/customers"),
                PublicRoute::new(Some("GET"), "/health"),
                PublicRoute::new(Some("GET"), "/swagger-ui/*"),
                PublicRoute::new(Some("GET"), "/api-docs/*"),
            ],
        }
    }
}

impl AccessPolicyConfig {
    /// Build from a comma separated list of entries.
    pub fn parse_list(list: &str) -> AppResult<Self> {
        let public_routes = list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(PublicRoute::parse)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self { public_routes })
    }

    pub fn is_public(&self, method: &str, path: &str) -> bool {
        self.public_routes.iter().any(|r| r.matches(method, path))
    }
}

/// Read and parse `key` from the environment, using `default` when it is
/// unset or blank. A value that does not parse is an error, not a fallback.
pub fn env_or<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|e| {
            AppError::validation(format!("Invalid value '{}' for {}: {}", raw, key, e))
        }),
        _ => Ok(default),
    }
}
