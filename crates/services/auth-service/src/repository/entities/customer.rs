//! Customer database entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::{AppError, AppResult};
use domain::{is_valid_role, Customer, Gender};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub age: i32,
    pub gender: String,
    /// Comma separated role names
    pub roles: String,
    pub profile_image_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Join roles for the `roles` column.
pub fn encode_roles(roles: &[String]) -> String {
    roles.join(",")
}

/// Split the `roles` column, dropping names this service does not grant.
fn decode_roles(column: &str) -> Vec<String> {
    column
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .filter(|r| {
            let known = is_valid_role(r);
            if !known {
                tracing::warn!(role = %r, "Ignoring unknown stored role");
            }
            known
        })
        .map(str::to_string)
        .collect()
}

/// Convert database model to domain entity
impl TryFrom<Model> for Customer {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        let gender: Gender = model.gender.parse().map_err(|_| {
            AppError::internal(format!(
                "Unrecognised gender '{}' stored for customer {}",
                model.gender, model.id
            ))
        })?;

        Ok(Customer {
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            age: model.age,
            gender,
            roles: decode_roles(&model.roles),
            profile_image_id: model.profile_image_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
