//! Gateway configuration.

use std::env;

use common::{env_or, AccessPolicyConfig, AppResult, CorsConfig};

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Cross-origin settings for the browser client
    pub cors: CorsConfig,
    /// Routes reachable without a session token
    pub access: AccessPolicyConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Fails when `PUBLIC_ROUTES` contains a malformed entry, when
    /// `CORS_ORIGINS` contains `*`, or when a numeric or boolean setting does
    /// not parse.
    pub fn from_env() -> AppResult<Self> {
        let defaults = CorsConfig::default();
        let cors = CorsConfig {
            allowed_origins: env::var("CORS_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or_default(),
            max_age_seconds: env_or("CORS_MAX_AGE", defaults.max_age_seconds)?,
            allow_credentials: env_or("CORS_ALLOW_CREDENTIALS", defaults.allow_credentials)?,
        };
        cors.validate()?;

        let access = match env::var("PUBLIC_ROUTES") {
            Ok(list) if !list.trim().is_empty() => AccessPolicyConfig::parse_list(&list)?,
            _ => AccessPolicyConfig::default(),
        };

        Ok(Self {
            host: env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("GATEWAY_PORT", 8080)?,
            cors,
            access,
        })
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors: CorsConfig::default(),
            access: AccessPolicyConfig::default(),
        }
    }
}

fn parse_origins(list: &str) -> Vec<String> {
    list.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(" https://a.example.com/, https://b.example.com ,,"),
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn test_wildcard_origin_rejected() {
        let cors = CorsConfig {
            allowed_origins: parse_origins("*"),
            ..Default::default()
        };
        assert!(matches!(cors.validate(), Err(common::AppError::Validation(_))));

        let cors = CorsConfig {
            allowed_origins: parse_origins("https://a.example.com, *"),
            ..Default::default()
        };
        assert!(cors.validate().is_err());
    }

    #[test]
    fn test_from_env_rejects_wildcard_origin() {
        std::env::set_var("CORS_ORIGINS", "*");
        let result = GatewayConfig::from_env();
        std::env::remove_var("CORS_ORIGINS");

        assert!(matches!(result, Err(common::AppError::Validation(_))));
    }

    #[test]
    fn test_default_policy_keeps_login_public() {
        let config = GatewayConfig::default();
        assert!(config.access.is_public("POST", "/api/v1/auth/login"));
        assert!(!config.access.is_public("GET", "/api/v1/customers"));
    }
}
