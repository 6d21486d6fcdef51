//! Password value object - Domain layer password handling.
//!
//! Secrets never leave this module in plaintext: they are hashed with
//! Argon2 and a random salt, and verification happens against the stored
//! PHC string only.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::error::{DomainError, DomainResult};

/// Input hashed to build the timing-equalisation hash for unknown identifiers.
const DUMMY_SECRET: &str = "customer-portal-dummy-secret";

/// Password value object that handles hashing and verification.
///
/// Holds only the salted hash; two instances built from the same
/// plaintext compare unequal because their salts differ.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// # Errors
    /// Returns a password error if the plain text is outside the accepted
    /// length range.
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        let length = plain_text.chars().count();
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
            return Err(DomainError::password(format!(
                "Password must be between {} and {} characters",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            )));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from storage).
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Build a valid hash of a fixed secret.
    ///
    /// Verifying against it costs the same as verifying a real customer's
    /// hash, so lookups for unknown identifiers take comparable time.
    pub fn dummy() -> DomainResult<Self> {
        Ok(Self {
            hash: Self::hash(DUMMY_SECRET)?,
        })
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// A malformed stored hash never verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> DomainResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| DomainError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "s3cret!";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("s3cret?"));
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let password = Password::new("hunter22").unwrap();
        assert_ne!(password.as_str(), "hunter22");
        assert!(password.as_str().starts_with("$argon2"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "TestPass1";
        let hash = Password::new(plain).unwrap().into_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePass";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        assert_ne!(pass1, pass2);
        assert!(pass1.verify(plain));
        assert!(pass2.verify(plain));
    }

    #[test]
    fn test_password_length_bounds() {
        assert!(Password::new("abc").is_err());
        assert!(Password::new("abcd").is_ok());
        assert!(Password::new(&"a".repeat(20)).is_ok());
        assert!(matches!(
            Password::new(&"a".repeat(21)),
            Err(DomainError::Password(_))
        ));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let password = Password::from_hash("not-a-phc-string");
        assert!(!password.verify("anything"));
    }

    #[test]
    fn test_dummy_rejects_everything_plausible() {
        let dummy = Password::dummy().unwrap();
        assert!(!dummy.verify(""));
        assert!(!dummy.verify("password"));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = Password::new("visible?").unwrap();
        let debug = format!("{:?}", password);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(password.as_str()));
    }
}
