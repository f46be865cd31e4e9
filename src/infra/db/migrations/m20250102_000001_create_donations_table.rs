//! Migration: Create donations table.
//!
//! Referential integrity for the role-scoped user columns (donor_id,
//! foodbank_id, recipient_id) is validated by the service layer, not by
//! database constraints; the schema keeps plain uuid columns.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Donations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Donations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Donations::DonorId).uuid().not_null())
                    .col(ColumnDef::new(Donations::FoodbankId).uuid().not_null())
                    .col(ColumnDef::new(Donations::RecipientId).uuid().null())
                    .col(ColumnDef::new(Donations::Category).string().not_null())
                    .col(ColumnDef::new(Donations::Quantity).integer().not_null())
                    .col(ColumnDef::new(Donations::Status).string().not_null())
                    .col(ColumnDef::new(Donations::AssignedRequestId).uuid().null())
                    .col(
                        ColumnDef::new(Donations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Donations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Donations::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_donations_donor_id")
                    .table(Donations::Table)
                    .col(Donations::DonorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_donations_foodbank_id")
                    .table(Donations::Table)
                    .col(Donations::FoodbankId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_donations_deleted_at")
                    .table(Donations::Table)
                    .col(Donations::DeletedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Donations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Donations {
    Table,
    Id,
    DonorId,
    FoodbankId,
    RecipientId,
    Category,
    Quantity,
    Status,
    AssignedRequestId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
