//! In-process customer store for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::customer_repository::{CustomerDraft, CustomerRepository};
use common::{AppError, AppResult};
use domain::Customer;

/// Customers held in a `RwLock`ed map. Reads run concurrently.
#[derive(Default)]
pub struct InMemoryCustomerStore {
    customers: RwLock<HashMap<Uuid, Customer>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a fully built customer, replacing any with the same id.
    pub async fn insert(&self, customer: Customer) {
        self.customers.write().await.insert(customer.id, customer);
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Customer>> {
        Ok(self.customers.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Customer>> {
        Ok(self
            .customers
            .read()
            .await
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn create(&self, draft: CustomerDraft) -> AppResult<Customer> {
        let mut customers = self.customers.write().await;
        if customers.values().any(|c| c.email == draft.email) {
            return Err(AppError::conflict("Customer"));
        }

        let customer = Customer::new(
            Uuid::new_v4(),
            draft.name,
            draft.email,
            draft.password_hash,
            draft.age,
            draft.gender,
        );
        customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn update(&self, customer: Customer) -> AppResult<Customer> {
        let mut customers = self.customers.write().await;
        if !customers.contains_key(&customer.id) {
            return Err(AppError::NotFound);
        }
        if customers
            .values()
            .any(|c| c.id != customer.id && c.email == customer.email)
        {
            return Err(AppError::conflict("Customer"));
        }

        customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.customers.write().await.remove(&id).is_some())
    }

    async fn list(&self) -> AppResult<Vec<Customer>> {
        let mut customers: Vec<Customer> = self.customers.read().await.values().cloned().collect();
        customers.sort_by_key(|c| c.created_at);
        Ok(customers)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Gender;

    fn draft(email: &str) -> CustomerDraft {
        CustomerDraft {
            name: "Grace Hopper".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            age: 40,
            gender: Gender::Female,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = InMemoryCustomerStore::new();
        let created = store.create(draft("grace@example.com")).await.unwrap();

        let by_email = store.find_by_email("grace@example.com").await.unwrap();
        let by_id = store.find_by_id(created.id).await.unwrap();

        assert_eq!(by_email.unwrap().id, created.id);
        assert_eq!(by_id.unwrap().email, "grace@example.com");
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryCustomerStore::new();
        store.create(draft("dup@example.com")).await.unwrap();

        let result = store.create(draft("dup@example.com")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_returns_all() {
        let store = InMemoryCustomerStore::new();
        assert!(store.list().await.unwrap().is_empty());

        store.create(draft("a@example.com")).await.unwrap();
        store.create(draft("b@example.com")).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_replaces_profile_and_guards_email() {
        let store = InMemoryCustomerStore::new();
        let mut grace = store.create(draft("grace@example.com")).await.unwrap();
        store.create(draft("ada@example.com")).await.unwrap();

        grace.name = "Rear Admiral Hopper".to_string();
        let updated = store.update(grace.clone()).await.unwrap();
        assert_eq!(updated.name, "Rear Admiral Hopper");
        assert_eq!(
            store.find_by_id(grace.id).await.unwrap().unwrap().name,
            "Rear Admiral Hopper"
        );

        grace.email = "ada@example.com".to_string();
        assert!(matches!(
            store.update(grace).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let store = InMemoryCustomerStore::new();
        let ghost = Customer::new(
            Uuid::new_v4(),
            "Ghost".to_string(),
            "ghost@example.com".to_string(),
            "$argon2id$stub".to_string(),
            30,
            Gender::Male,
        );

        assert!(matches!(store.update(ghost).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryCustomerStore::new();
        let created = store.create(draft("grace@example.com")).await.unwrap();

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(store.find_by_email("grace@example.com").await.unwrap().is_none());
    }
}
