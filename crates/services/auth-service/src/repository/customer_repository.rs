//! Customer repository: the credential store behind the issuer.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, Statement,
};
use uuid::Uuid;

use super::entities::customer::{self, encode_roles, ActiveModel, Entity as CustomerEntity};
use common::{AppError, AppResult};
use domain::{Customer, Gender, ROLE_USER};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fields of a customer about to be stored. The secret is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: i32,
    pub gender: Gender,
}

/// Customer repository trait for dependency injection.
///
/// Any failure to reach the backing store is reported as
/// `AppError::StoreUnavailable`; a duplicate email on `create` or `update`
/// is `AppError::Conflict`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Find customer by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Customer>>;

    /// Find customer by login email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Customer>>;

    /// Store a new customer with the default role
    async fn create(&self, draft: CustomerDraft) -> AppResult<Customer>;

    /// Persist the profile fields (name, email, age) of an existing
    /// customer. `AppError::NotFound` when the id is unknown.
    async fn update(&self, customer: Customer) -> AppResult<Customer>;

    /// Remove a customer. Returns `false` when no customer had that id.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// List all customers, oldest first
    async fn list(&self) -> AppResult<Vec<Customer>>;

    /// Check that the store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// Postgres-backed repository
pub struct CustomerStore {
    db: DatabaseConnection,
}

impl CustomerStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomerRepository for CustomerStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Customer>> {
        CustomerEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Customer::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Customer>> {
        CustomerEntity::find()
            .filter(customer::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(Customer::try_from)
            .transpose()
    }

    async fn create(&self, draft: CustomerDraft) -> AppResult<Customer> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(draft.name),
            email: Set(draft.email),
            password_hash: Set(draft.password_hash),
            age: Set(draft.age),
            gender: Set(draft.gender.as_str().to_string()),
            roles: Set(encode_roles(&[ROLE_USER.to_string()])),
            profile_image_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Customer::try_from(model)
    }

    async fn update(&self, customer: Customer) -> AppResult<Customer> {
        let existing = CustomerEntity::find_by_id(customer.id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(customer.name);
        active.email = Set(customer.email);
        active.age = Set(customer.age);
        active.updated_at = Set(customer.updated_at);

        let model = active.update(&self.db).await?;
        Customer::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = CustomerEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list(&self) -> AppResult<Vec<Customer>> {
        CustomerEntity::find()
            .order_by_asc(customer::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Customer::try_from)
            .collect()
    }

    async fn ping(&self) -> AppResult<()> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
