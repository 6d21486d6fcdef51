//! Migration: Create the customers table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Customers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Customers::Name).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Customers::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Customers::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Customers::Age).integer().not_null())
                    .col(ColumnDef::new(Customers::Gender).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Customers::Roles)
                            .string()
                            .not_null()
                            .default("ROLE_USER"),
                    )
                    .col(ColumnDef::new(Customers::ProfileImageId).string().null())
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Customers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Age,
    Gender,
    Roles,
    ProfileImageId,
    CreatedAt,
    UpdatedAt,
}
