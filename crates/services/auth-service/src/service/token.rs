//! Session token codec: HS256 JWTs bound to a customer identity.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{AppError, AppResult, JwtConfig};
use domain::{CustomerIdentity, SECONDS_PER_HOUR};

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Login identifier of the customer
    pub sub: String,
    /// Customer id
    pub cid: Uuid,
    /// Granted roles
    pub scopes: Vec<String>,
    pub iat: i64,
    pub exp: i64,
    /// Random token id, unique per issued token
    pub jti: Uuid,
}

/// A signed session token and its expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl SessionToken {
    /// The encoded token string.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// Issues and verifies session tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Build an issuer from validated JWT settings.
    pub fn new(config: &JwtConfig) -> AppResult<Self> {
        config.validate()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_seconds;
        validation.validate_exp = true;

        let lifetime = config
            .expiration_hours
            .checked_mul(SECONDS_PER_HOUR)
            .and_then(Duration::try_seconds)
            .ok_or_else(|| AppError::internal("JWT expiration is out of range"))?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_bytes()),
            validation,
            lifetime,
        })
    }

    /// Issue a fresh token for `identity`, valid from now.
    pub fn issue(&self, identity: &CustomerIdentity) -> AppResult<SessionToken> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if it had been created at `issued_at`.
    pub fn issue_at(
        &self,
        identity: &CustomerIdentity,
        issued_at: DateTime<Utc>,
    ) -> AppResult<SessionToken> {
        let expires_at = issued_at
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AppError::internal("Token expiry out of range"))?;

        let claims = SessionClaims {
            sub: identity.username.clone(),
            cid: identity.id,
            scopes: identity.roles.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };

        let value = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

        // Second precision, matching what the token itself carries.
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| AppError::internal("Token expiry out of range"))?;

        Ok(SessionToken { value, expires_at })
    }

    /// Check signature, algorithm and expiry, returning the claims.
    ///
    /// Any rejection is `AppError::Jwt`, which responds as `401`.
    pub fn verify(&self, token: &str) -> AppResult<SessionClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Gender, ROLE_USER};

    const SECRET: &str = "test-secret-that-is-at-least-32-characters";

    fn issuer_with_leeway(leeway_seconds: u64) -> TokenIssuer {
        TokenIssuer::new(&JwtConfig {
            secret: SECRET.to_string(),
            expiration_hours: 1,
            leeway_seconds,
        })
        .unwrap()
    }

    fn issuer() -> TokenIssuer {
        issuer_with_leeway(0)
    }

    fn identity() -> CustomerIdentity {
        CustomerIdentity {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            gender: Gender::Female,
            age: 36,
            roles: vec![ROLE_USER.to_string()],
            username: "ada@example.com".to_string(),
            profile_image_id: None,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = issuer();
        let identity = identity();

        let token = issuer.issue(&identity).unwrap();
        let claims = issuer.verify(token.as_str()).unwrap();

        assert_eq!(claims.sub, "ada@example.com");
        assert_eq!(claims.cid, identity.id);
        assert_eq!(claims.scopes, vec![ROLE_USER.to_string()]);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(token.expires_at().timestamp(), claims.exp);
    }

    #[test]
    fn test_tokens_issued_together_differ() {
        let issuer = issuer();
        let identity = identity();
        let now = Utc::now();

        let first = issuer.issue_at(&identity, now).unwrap();
        let second = issuer.issue_at(&identity, now).unwrap();

        assert_ne!(first.as_str(), second.as_str());
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer();
        let token = issuer
            .issue_at(&identity(), Utc::now() - Duration::hours(2))
            .unwrap();

        assert!(matches!(
            issuer.verify(token.as_str()),
            Err(AppError::Jwt(_))
        ));
        assert!(token.expires_at() < Utc::now());
    }

    #[test]
    fn test_leeway_tolerates_recent_expiry() {
        // Issued an hour and a minute ago: expired sixty seconds ago.
        let issued_at = Utc::now() - Duration::hours(1) - Duration::seconds(60);
        let token = issuer().issue_at(&identity(), issued_at).unwrap();

        assert!(issuer().verify(token.as_str()).is_err());
        assert!(issuer_with_leeway(120).verify(token.as_str()).is_ok());
        assert!(issuer_with_leeway(30).verify(token.as_str()).is_err());
    }

    #[test]
    fn test_oversized_lifetime_refused() {
        let result = TokenIssuer::new(&JwtConfig {
            secret: SECRET.to_string(),
            expiration_hours: 10_000_000_000,
            leeway_seconds: 0,
        });
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_expiry_past_calendar_range_is_error() {
        let result = issuer().issue_at(&identity(), DateTime::<Utc>::MAX_UTC);
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let other = TokenIssuer::new(&JwtConfig {
            secret: "another-secret-that-is-also-32-characters-long".to_string(),
            expiration_hours: 1,
            leeway_seconds: 0,
        })
        .unwrap();
        let token = other.issue(&identity()).unwrap();

        assert!(matches!(
            issuer().verify(token.as_str()),
            Err(AppError::Jwt(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            issuer().verify("not.a.jwt"),
            Err(AppError::Jwt(_))
        ));
    }

    #[test]
    fn test_short_secret_refused() {
        let result = TokenIssuer::new(&JwtConfig {
            secret: "short".to_string(),
            expiration_hours: 1,
            leeway_seconds: 0,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_value() {
        let token = issuer().issue(&identity()).unwrap();
        assert!(!format!("{:?}", token).contains(token.as_str()));
    }
}
