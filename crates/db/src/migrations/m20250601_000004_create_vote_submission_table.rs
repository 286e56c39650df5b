//! Create `vote_submission` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VoteSubmission::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(VoteSubmission::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(VoteSubmission::LocationKey).string_len(256).not_null())
                    .col(ColumnDef::new(VoteSubmission::Difficulty).string_len(64).not_null())
                    .col(ColumnDef::new(VoteSubmission::Notes).text().not_null().default(""))
                    .col(
                        ColumnDef::new(VoteSubmission::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(VoteSubmission::IsApproved).boolean().not_null().default(false))
                    .col(ColumnDef::new(VoteSubmission::ApprovedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: (location_key, is_approved) for bulk approve/reject
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_submission_location_key_approved")
                    .table(VoteSubmission::Table)
                    .col(VoteSubmission::LocationKey)
                    .col(VoteSubmission::IsApproved)
                    .to_owned(),
            )
            .await?;

        // Index: created_at for the pending queue
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_submission_created_at")
                    .table(VoteSubmission::Table)
                    .col(VoteSubmission::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VoteSubmission::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VoteSubmission {
    Table,
    Id,
    LocationKey,
    Difficulty,
    Notes,
    CreatedAt,
    IsApproved,
    ApprovedAt,
}
