//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Customer Roles
// =============================================================================

/// Default role granted to every registered customer
pub const ROLE_USER: &str = "ROLE_USER";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_ADMIN];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Maximum password length accepted at registration
pub const MAX_PASSWORD_LENGTH: usize = 20;

/// Maximum customer name length
pub const MAX_NAME_LENGTH: usize = 50;

/// Youngest age allowed to register
pub const MIN_CUSTOMER_AGE: i32 = 16;

/// Oldest age allowed to register
pub const MAX_CUSTOMER_AGE: i32 = 100;

// =============================================================================
// Authentication
// =============================================================================

/// Default session token lifetime in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Longest session token lifetime accepted from configuration (one year)
pub const MAX_JWT_EXPIRATION_HOURS: i64 = 24 * 365;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";
