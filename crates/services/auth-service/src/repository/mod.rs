//! Repository layer for credential data access.

pub mod entities;
mod customer_repository;
mod memory;

pub use customer_repository::{CustomerDraft, CustomerRepository, CustomerStore};
pub use memory::InMemoryCustomerStore;

#[cfg(any(test, feature = "test-utils"))]
pub use customer_repository::MockCustomerRepository;
