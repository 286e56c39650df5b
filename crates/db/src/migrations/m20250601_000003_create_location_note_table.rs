//! Create `location_note` table migration.

use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_location_table::Location;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LocationNote::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LocationNote::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(LocationNote::LocationId).string_len(32).not_null())
                    .col(ColumnDef::new(LocationNote::Content).text().not_null())
                    .col(
                        ColumnDef::new(LocationNote::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(LocationNote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(LocationNote::ApprovedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_location_note_location")
                            .from(LocationNote::Table, LocationNote::LocationId)
                            .to(Location::Table, Location::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (location_id, status) for listing one list of a location
        manager
            .create_index(
                Index::create()
                    .name("idx_location_note_location_status")
                    .table(LocationNote::Table)
                    .col(LocationNote::LocationId)
                    .col(LocationNote::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LocationNote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LocationNote {
    Table,
    Id,
    LocationId,
    Content,
    Status,
    CreatedAt,
    ApprovedAt,
}
