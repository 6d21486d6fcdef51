//! Login credential.

/// Identifier + secret pair presented at login.
///
/// Transient: it is consumed by authentication and never stored.
#[derive(Clone)]
pub struct Credential {
    identifier: String,
    secret: String,
}

impl Credential {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    /// Identifier with surrounding whitespace removed.
    pub fn identifier(&self) -> &str {
        self.identifier.trim()
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Whether the identifier is blank.
    pub fn is_blank(&self) -> bool {
        self.identifier().is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
