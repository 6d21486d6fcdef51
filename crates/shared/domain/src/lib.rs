//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Types here are shared by the auth service and the HTTP gateway.

pub mod constants;
pub mod credential;
pub mod customer;
pub mod error;
pub mod password;

pub use constants::*;
pub use credential::Credential;
pub use customer::{Customer, CustomerIdentity, CustomerUpdate, Gender, NewCustomer};
pub use error::{DomainError, DomainResult};
pub use password::Password;
