//! Customer queries and profile maintenance for authenticated callers.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::{bounded, normalize_identifier};
use crate::config::AuthServiceConfig;
use crate::repository::CustomerRepository;
use common::{AppError, AppResult, OptionExt};
use domain::{CustomerIdentity, CustomerUpdate};

/// Customer query service trait for dependency injection.
#[async_trait]
pub trait CustomerService: Send + Sync {
    /// Fetch one customer's identity, `AppError::NotFound` when absent.
    async fn get_customer(&self, id: Uuid) -> AppResult<CustomerIdentity>;

    /// All customers, oldest first.
    async fn list_customers(&self) -> AppResult<Vec<CustomerIdentity>>;

    /// Change a customer's name, email or age.
    ///
    /// Fails with `AppError::Validation` when nothing would change and with
    /// `AppError::Conflict` when the new email belongs to someone else.
    async fn update_customer(&self, id: Uuid, update: CustomerUpdate)
        -> AppResult<CustomerIdentity>;

    /// Remove a customer, `AppError::NotFound` when absent.
    async fn delete_customer(&self, id: Uuid) -> AppResult<()>;

    /// Check that the credential store answers.
    async fn health_check(&self) -> AppResult<()>;
}

pub struct CustomerManager {
    customers: Arc<dyn CustomerRepository>,
    store_timeout: Duration,
}

impl CustomerManager {
    pub fn new(customers: Arc<dyn CustomerRepository>, config: &AuthServiceConfig) -> Self {
        Self {
            customers,
            store_timeout: config.store_timeout(),
        }
    }
}

#[async_trait]
impl CustomerService for CustomerManager {
    async fn get_customer(&self, id: Uuid) -> AppResult<CustomerIdentity> {
        bounded(self.store_timeout, self.customers.find_by_id(id))
            .await?
            .map(CustomerIdentity::from)
            .ok_or_not_found()
    }

    async fn list_customers(&self) -> AppResult<Vec<CustomerIdentity>> {
        let customers = bounded(self.store_timeout, self.customers.list()).await?;
        Ok(customers.into_iter().map(CustomerIdentity::from).collect())
    }

    async fn update_customer(
        &self,
        id: Uuid,
        mut update: CustomerUpdate,
    ) -> AppResult<CustomerIdentity> {
        update.validate()?;
        update.email = update.email.map(|email| normalize_identifier(&email));

        let mut customer = bounded(self.store_timeout, self.customers.find_by_id(id))
            .await?
            .ok_or_not_found()?;

        if let Some(email) = update.email.as_deref().filter(|e| *e != customer.email) {
            if bounded(self.store_timeout, self.customers.find_by_email(email))
                .await?
                .is_some()
            {
                return Err(AppError::conflict("Customer"));
            }
        }

        if !update.apply_to(&mut customer) {
            return Err(AppError::validation("No data changes found"));
        }

        let customer = bounded(self.store_timeout, self.customers.update(customer)).await?;
        tracing::info!(
            target: "audit",
            event = "customer_update",
            customer_id = %customer.id,
            "Customer profile updated"
        );
        Ok(customer.identity())
    }

    async fn delete_customer(&self, id: Uuid) -> AppResult<()> {
        if !bounded(self.store_timeout, self.customers.delete(id)).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(
            target: "audit",
            event = "customer_delete",
            customer_id = %id,
            "Customer deleted"
        );
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        bounded(self.store_timeout, self.customers.ping()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryCustomerStore, MockCustomerRepository};
    use domain::{Customer, Gender};

    fn customer(email: &str) -> Customer {
        Customer::new(
            Uuid::new_v4(),
            "Ada".to_string(),
            email.to_string(),
            "hash".to_string(),
            36,
            Gender::Female,
        )
    }

    #[tokio::test]
    async fn test_get_customer() {
        let stored = customer("ada@example.com");
        let id = stored.id;
        let store = InMemoryCustomerStore::new();
        store.insert(stored).await;

        let manager = CustomerManager::new(Arc::new(store), &AuthServiceConfig::default());

        let identity = manager.get_customer(id).await.unwrap();
        assert_eq!(identity.id, id);
        assert_eq!(identity.username, "ada@example.com");
    }

    #[tokio::test]
    async fn test_get_missing_customer_is_not_found() {
        let manager = CustomerManager::new(
            Arc::new(InMemoryCustomerStore::new()),
            &AuthServiceConfig::default(),
        );

        let result = manager.get_customer(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_customers() {
        let store = InMemoryCustomerStore::new();
        store.insert(customer("a@example.com")).await;
        store.insert(customer("b@example.com")).await;

        let manager = CustomerManager::new(Arc::new(store), &AuthServiceConfig::default());

        assert_eq!(manager.list_customers().await.unwrap().len(), 2);
    }

    async fn manager_with(customers: &[&str]) -> (CustomerManager, Vec<Uuid>) {
        let store = InMemoryCustomerStore::new();
        let mut ids = Vec::new();
        for email in customers {
            let stored = customer(email);
            ids.push(stored.id);
            store.insert(stored).await;
        }
        (
            CustomerManager::new(Arc::new(store), &AuthServiceConfig::default()),
            ids,
        )
    }

    #[tokio::test]
    async fn test_update_customer_changes_profile() {
        let (manager, ids) = manager_with(&["ada@example.com"]).await;

        let identity = manager
            .update_customer(
                ids[0],
                CustomerUpdate {
                    name: Some("Ada King".to_string()),
                    email: Some(" ADA.KING@example.com ".to_string()),
                    age: Some(37),
                },
            )
            .await
            .unwrap();

        assert_eq!(identity.name, "Ada King");
        assert_eq!(identity.email, "ada.king@example.com");
        assert_eq!(identity.username, "ada.king@example.com");
        assert_eq!(manager.get_customer(ids[0]).await.unwrap(), identity);
    }

    #[tokio::test]
    async fn test_update_without_changes_is_rejected() {
        let (manager, ids) = manager_with(&["ada@example.com"]).await;

        let result = manager
            .update_customer(
                ids[0],
                CustomerUpdate {
                    name: Some("Ada".to_string()),
                    email: Some("ada@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_to_taken_email_conflicts() {
        let (manager, ids) = manager_with(&["ada@example.com", "grace@example.com"]).await;

        let result = manager
            .update_customer(
                ids[0],
                CustomerUpdate {
                    email: Some("grace@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_invalid_update_never_reaches_store() {
        let mut mock = MockCustomerRepository::new();
        mock.expect_find_by_id().never();
        mock.expect_update().never();

        let manager = CustomerManager::new(Arc::new(mock), &AuthServiceConfig::default());
        let result = manager
            .update_customer(
                Uuid::new_v4(),
                CustomerUpdate {
                    age: Some(12),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_customer() {
        let (manager, ids) = manager_with(&["ada@example.com"]).await;

        manager.delete_customer(ids[0]).await.unwrap();

        assert!(matches!(
            manager.get_customer(ids[0]).await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(
            manager.delete_customer(ids[0]).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_health_check_reports_store_failure() {
        let mut mock = MockCustomerRepository::new();
        mock.expect_ping()
            .returning(|| Err(AppError::store_unavailable("down")));

        let manager = CustomerManager::new(Arc::new(mock), &AuthServiceConfig::default());

        assert!(matches!(
            manager.health_check().await,
            Err(AppError::StoreUnavailable(_))
        ));
    }
}
