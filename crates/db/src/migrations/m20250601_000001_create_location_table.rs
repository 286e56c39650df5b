//! Create location table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Location::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Location::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Location::Key).string_len(256).not_null())
                    .col(ColumnDef::new(Location::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Location::Emoji).string_len(64).not_null().default(""))
                    .col(ColumnDef::new(Location::Difficulty).string_len(64).not_null().default(""))
                    .col(ColumnDef::new(Location::Color).string_len(16).not_null().default("#4ECDC4"))
                    .col(ColumnDef::new(Location::LocationData).json_binary())
                    .col(ColumnDef::new(Location::IsApproved).boolean().not_null().default(false))
                    .col(ColumnDef::new(Location::ApprovedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Location::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Location::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: key (not unique, duplicates are allowed)
        manager
            .create_index(
                Index::create()
                    .name("idx_location_key")
                    .table(Location::Table)
                    .col(Location::Key)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Location::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Location {
    Table,
    Id,
    Key,
    Name,
    Emoji,
    Difficulty,
    Color,
    LocationData,
    IsApproved,
    ApprovedAt,
    CreatedAt,
    UpdatedAt,
}
