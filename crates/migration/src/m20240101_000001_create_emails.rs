//! Create `emails` table keyed by the address itself.
//!
//! `confirmed_at` is an integer timestamp, 0 while unconfirmed.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Emails::Table)
                    .if_not_exists()
                    .col(string_len(Emails::Email, 255).primary_key())
                    .col(big_integer(Emails::ConfirmedAt).default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Emails::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Emails { Table, Email, ConfirmedAt }
