//! Create `location_vote` table migration.

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
                    .table(LocationVote::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LocationVote::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(LocationVote::LocationId).string_len(32).not_null())
                    .col(ColumnDef::new(LocationVote::Difficulty).string_len(64).not_null())
                    .col(ColumnDef::new(LocationVote::Count).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(LocationVote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_location_vote_location")
                            .from(LocationVote::Table, LocationVote::LocationId)
                            .to(Location::Table, Location::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (location_id, difficulty), the upsert target for tallies
        manager
            .create_index(
                Index::create()
                    .name("idx_location_vote_location_difficulty")
                    .table(LocationVote::Table)
                    .col(LocationVote::LocationId)
                    .col(LocationVote::Difficulty)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LocationVote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LocationVote {
    Table,
    Id,
    LocationId,
    Difficulty,
    Count,
    CreatedAt,
}
