//! Customer domain entity and the identity snapshot handed to callers.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::constants::{MAX_CUSTOMER_AGE, MAX_NAME_LENGTH, MIN_CUSTOMER_AGE, ROLE_USER};
use crate::error::{DomainError, DomainResult};

/// Customer gender as captured at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Stored/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            other => Err(DomainError::validation(format!("Unknown gender '{}'", other))),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored customer record.
///
/// The password hash never serializes; use [`CustomerIdentity`] for
/// anything that leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub age: i32,
    pub gender: Gender,
    pub roles: Vec<String>,
    pub profile_image_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Create a new customer with the default role
    pub fn new(
        id: Uuid,
        name: String,
        email: String,
        password_hash: String,
        age: i32,
        gender: Gender,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            password_hash,
            age,
            gender,
            roles: vec![ROLE_USER.to_string()],
            profile_image_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Login identifier. Customers sign in with their email address.
    pub fn username(&self) -> &str {
        &self.email
    }

    /// Snapshot the caller-visible identity of this customer.
    pub fn identity(&self) -> CustomerIdentity {
        CustomerIdentity::from(self)
    }
}

/// Data required to register a customer. The secret is still plaintext
/// here and is hashed before it reaches storage.
#[derive(Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: i32,
    pub gender: Gender,
}

impl std::fmt::Debug for NewCustomer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewCustomer")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("age", &self.age)
            .field("gender", &self.gender)
            .finish()
    }
}

impl NewCustomer {
    /// Check the registration rules that do not depend on the store.
    ///
    /// The password length is enforced separately by [`crate::Password::new`].
    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_age(self.age)
    }
}

/// Profile changes for an existing customer. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

impl CustomerUpdate {
    /// Same field rules as registration, applied to the fields present.
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        Ok(())
    }

    /// Write the present fields into `customer`.
    ///
    /// Returns `false` when every present field already held that value, in
    /// which case `customer` is left untouched.
    pub fn apply_to(self, customer: &mut Customer) -> bool {
        let mut changed = false;

        if let Some(name) = self.name {
            let name = name.trim();
            if name != customer.name {
                customer.name = name.to_string();
                changed = true;
            }
        }
        if let Some(email) = self.email {
            if email != customer.email {
                customer.email = email;
                changed = true;
            }
        }
        if let Some(age) = self.age {
            if age != customer.age {
                customer.age = age;
                changed = true;
            }
        }

        if changed {
            customer.updated_at = Utc::now();
        }
        changed
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    let len = name.trim().chars().count();
    if len == 0 || len > MAX_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "Name must be between 1 and {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Same email rule the HTTP layer applies with `#[validate(email)]`.
fn validate_email(email: &str) -> DomainResult<()> {
    if !email.trim().validate_email() {
        return Err(DomainError::validation("Invalid email format"));
    }
    Ok(())
}

fn validate_age(age: i32) -> DomainResult<()> {
    if !(MIN_CUSTOMER_AGE..=MAX_CUSTOMER_AGE).contains(&age) {
        return Err(DomainError::validation(format!(
            "Age must be between {} and {}",
            MIN_CUSTOMER_AGE, MAX_CUSTOMER_AGE
        )));
    }
    Ok(())
}

/// Immutable identity snapshot taken at authentication time.
///
/// This is the `customerDTO` half of an authentication response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CustomerIdentity {
    /// Stable customer identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Gender
    pub gender: Gender,
    /// Age in years
    pub age: i32,
    /// Granted roles
    pub roles: Vec<String>,
    /// Login identifier
    pub username: String,
    /// Profile image reference, if uploaded
    pub profile_image_id: Option<String>,
}

impl From<&Customer> for CustomerIdentity {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            email: customer.email.clone(),
            gender: customer.gender,
            age: customer.age,
            roles: customer.roles.clone(),
            username: customer.username().to_string(),
            profile_image_id: customer.profile_image_id.clone(),
        }
    }
}

impl From<Customer> for CustomerIdentity {
    fn from(customer: Customer) -> Self {
        CustomerIdentity::from(&customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Customer {
        Customer::new(
            Uuid::new_v4(),
            "Ada Lovelace".to_string(),
            "ada@example.com".to_string(),
            "$argon2id$stub".to_string(),
            36,
            Gender::Female,
        )
    }

    #[test]
    fn test_new_customer_has_user_role() {
        let customer = sample();
        assert_eq!(customer.roles, vec![ROLE_USER.to_string()]);
        assert!(customer.profile_image_id.is_none());
    }

    #[test]
    fn test_identity_mirrors_record() {
        let customer = sample();
        let identity = customer.identity();

        assert_eq!(identity.id, customer.id);
        assert_eq!(identity.email, customer.email);
        assert_eq!(identity.username, "ada@example.com");
        assert_eq!(identity.gender, Gender::Female);
        assert_eq!(identity.age, 36);
    }

    #[test]
    fn test_identity_serializes_camel_case_without_hash() {
        let json = serde_json::to_value(sample().identity()).unwrap();

        assert_eq!(json["gender"], "FEMALE");
        assert!(json.get("profileImageId").is_some());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_customer_never_serializes_hash() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("MALE".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("FEMALE".parse::<Gender>().unwrap(), Gender::Female);
        assert!("male".parse::<Gender>().is_err());
    }

    #[test]
    fn test_new_customer_validate() {
        let valid = NewCustomer {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            age: 16,
            gender: Gender::Female,
        };
        assert!(valid.validate().is_ok());

        let too_young = NewCustomer { age: 15, ..valid.clone() };
        assert!(matches!(too_young.validate(), Err(DomainError::Validation(_))));

        let bad_email = NewCustomer {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let long_name = NewCustomer {
            name: "x".repeat(51),
            ..valid
        };
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn test_email_rule_rejects_malformed_addresses() {
        let with_email = |email: &str| NewCustomer {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
            age: 36,
            gender: Gender::Female,
        };

        for bad in ["a@b.", "a@@b.com", "a@b..com", "@example.com", "ada example@x.com"] {
            assert!(
                matches!(with_email(bad).validate(), Err(DomainError::Validation(_))),
                "{} should be rejected",
                bad
            );
        }
        assert!(with_email("ada@localhost").validate().is_ok());
        assert!(with_email(" ada@example.com ").validate().is_ok());
    }

    #[test]
    fn test_update_validates_present_fields_only() {
        assert!(CustomerUpdate::default().validate().is_ok());

        let update = CustomerUpdate {
            age: Some(101),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = CustomerUpdate {
            email: Some("a@b..com".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_update_apply_reports_changes() {
        let mut customer = sample();
        let before = customer.updated_at;

        let same = CustomerUpdate {
            name: Some(" Ada Lovelace ".to_string()),
            age: Some(36),
            ..Default::default()
        };
        assert!(!same.apply_to(&mut customer));
        assert_eq!(customer.updated_at, before);

        let older = CustomerUpdate {
            age: Some(37),
            ..Default::default()
        };
        assert!(older.apply_to(&mut customer));
        assert_eq!(customer.age, 37);
        assert_eq!(customer.name, "Ada Lovelace");
    }

    #[test]
    fn test_new_customer_debug_redacts_password() {
        let new = NewCustomer {
            name: "A".to_string(),
            email: "a@example.com".to_string(),
            password: "plaintext".to_string(),
            age: 20,
            gender: Gender::Male,
        };
        assert!(!format!("{:?}", new).contains("plaintext"));
    }
}
