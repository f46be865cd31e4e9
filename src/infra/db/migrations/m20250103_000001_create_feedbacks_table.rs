//! Migration: Create feedbacks table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feedbacks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Feedbacks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Feedbacks::RecipientId).uuid().not_null())
                    .col(ColumnDef::new(Feedbacks::FoodbankId).uuid().not_null())
                    .col(ColumnDef::new(Feedbacks::ThankYouNote).text().not_null())
                    .col(ColumnDef::new(Feedbacks::Rating).integer().not_null())
                    .col(
                        ColumnDef::new(Feedbacks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Feedbacks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Feedbacks::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feedbacks_deleted_at")
                    .table(Feedbacks::Table)
                    .col(Feedbacks::DeletedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feedbacks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Feedbacks {
    Table,
    Id,
    RecipientId,
    FoodbankId,
    ThankYouNote,
    Rating,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
