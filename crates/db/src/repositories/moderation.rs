//! Moderation repository: vote submissions and the approve/reject transitions.

use std::sync::Arc;
use std::time::Duration;

use battlefield_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};

use super::note::touch_location;
use super::{DEFAULT_OPERATION_TIMEOUT, bounded};
use crate::entities::{
    Location, LocationNote, LocationVote, VoteSubmission, location, location_note,
    location_note::NoteStatus, location_vote, vote_submission,
};

/// Everything written for one incoming vote.
#[derive(Debug, Clone)]
pub struct VoteWrite {
    /// Location being voted on.
    pub location_id: String,
    /// Trimmed difficulty label.
    pub difficulty: String,
    /// ID used if this vote creates the tally row.
    pub tally_id: String,
    /// ID of the queued submission.
    pub submission_id: String,
    /// Raw note text, stored on the submission as sent.
    pub notes: String,
    /// Pending note to attach when the text is not blank.
    pub pending_note: Option<location_note::ActiveModel>,
}

/// Rows produced by [`ModerationRepository::record_vote`].
#[derive(Debug, Clone)]
pub struct RecordedVote {
    /// The queued submission.
    pub submission: vote_submission::Model,
    /// The tally after the increment.
    pub tally: location_vote::Model,
    /// The pending note, if one was written.
    pub note: Option<location_note::Model>,
}

/// Changes applied to a location when its votes are approved.
#[derive(Debug, Clone, Default)]
pub struct ApprovalWrite {
    /// Final difficulty for the location.
    pub difficulty: String,
    /// Pending notes of the location to move into the approved list.
    pub promote_note_ids: Vec<String>,
    /// Freshly minted approved notes.
    pub new_notes: Vec<location_note::ActiveModel>,
}

/// What an approval changed.
#[derive(Debug, Clone, Default)]
pub struct ApprovalOutcome {
    /// Submissions marked approved.
    pub votes_approved: u64,
    /// Pending notes moved into the approved list.
    pub notes_promoted: u64,
    /// Approved notes inserted from free text.
    pub notes_created: Vec<location_note::Model>,
    /// Pending notes deleted.
    pub pending_discarded: u64,
    /// Whether the location row itself was modified.
    pub updated: bool,
}

/// Repository for the vote-submission queue and moderation writes.
#[derive(Clone)]
pub struct ModerationRepository {
    db: Arc<DatabaseConnection>,
    timeout: Duration,
}

impl ModerationRepository {
    /// Create a new moderation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Override the per-operation timeout.
    #[must_use]
    pub const fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Count a vote on a location and queue it for moderation.
    ///
    /// The tally upsert relies on the unique `(location_id, difficulty)` index,
    /// so concurrent first votes for the same label cannot create two rows.
    pub async fn record_vote(&self, vote: VoteWrite) -> AppResult<RecordedVote> {
        let db = self.db.clone();
        let recorded = bounded(self.timeout, async move {
            let txn = db.begin().await?;

            let Some(target) = Location::find_by_id(&vote.location_id).one(&txn).await? else {
                txn.rollback().await?;
                return Ok(None);
            };
            let now = Utc::now();

            let first_vote = location_vote::ActiveModel {
                id: Set(vote.tally_id),
                location_id: Set(target.id.clone()),
                difficulty: Set(vote.difficulty.clone()),
                count: Set(1),
                created_at: Set(now.into()),
            };
            LocationVote::insert(first_vote)
                .on_conflict(
                    OnConflict::columns([
                        location_vote::Column::LocationId,
                        location_vote::Column::Difficulty,
                    ])
                    .value(
                        location_vote::Column::Count,
                        Expr::col((LocationVote, location_vote::Column::Count)).add(1),
                    )
                    .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;

            let tally = LocationVote::find()
                .filter(location_vote::Column::LocationId.eq(&target.id))
                .filter(location_vote::Column::Difficulty.eq(&vote.difficulty))
                .one(&txn)
                .await?
                .ok_or_else(|| DbErr::RecordNotFound("vote tally".to_string()))?;

            let submission = vote_submission::ActiveModel {
                id: Set(vote.submission_id),
                location_key: Set(target.key.clone()),
                difficulty: Set(vote.difficulty),
                notes: Set(vote.notes),
                created_at: Set(now.into()),
                is_approved: Set(false),
                approved_at: Set(None),
            }
            .insert(&txn)
            .await?;

            let note = match vote.pending_note {
                Some(note) => Some(note.insert(&txn).await?),
                None => None,
            };
            touch_location(&txn, &target.id).await?;

            txn.commit().await?;
            Ok(Some(RecordedVote {
                submission,
                tally,
                note,
            }))
        })
        .await?;

        recorded.ok_or_else(|| AppError::NotFound("Location not found".to_string()))
    }

    /// All unapproved submissions, oldest first.
    pub async fn find_pending(&self) -> AppResult<Vec<vote_submission::Model>> {
        bounded(
            self.timeout,
            VoteSubmission::find()
                .filter(vote_submission::Column::IsApproved.eq(false))
                .order_by_asc(vote_submission::Column::CreatedAt)
                .order_by_asc(vote_submission::Column::Id)
                .all(self.db.as_ref()),
        )
        .await
    }

    /// Approve a location's queued votes and settle its notes.
    pub async fn approve(
        &self,
        target: &location::Model,
        write: ApprovalWrite,
    ) -> AppResult<ApprovalOutcome> {
        let db = self.db.clone();
        bounded(self.timeout, async move {
            let txn = db.begin().await?;
            let now = Utc::now();

            let votes = VoteSubmission::update_many()
                .col_expr(vote_submission::Column::IsApproved, Expr::value(true))
                .col_expr(vote_submission::Column::ApprovedAt, Expr::value(now))
                .filter(vote_submission::Column::LocationKey.eq(&target.key))
                .filter(vote_submission::Column::IsApproved.eq(false))
                .exec(&txn)
                .await?;

            let notes_promoted = if write.promote_note_ids.is_empty() {
                0
            } else {
                LocationNote::update_many()
                    .col_expr(
                        location_note::Column::Status,
                        Expr::value(NoteStatus::Approved.to_value()),
                    )
                    .col_expr(location_note::Column::ApprovedAt, Expr::value(now))
                    .filter(location_note::Column::LocationId.eq(&target.id))
                    .filter(location_note::Column::Status.eq(NoteStatus::Pending))
                    .filter(location_note::Column::Id.is_in(write.promote_note_ids))
                    .exec(&txn)
                    .await?
                    .rows_affected
            };

            let mut notes_created = Vec::with_capacity(write.new_notes.len());
            for note in write.new_notes {
                notes_created.push(note.insert(&txn).await?);
            }

            let discarded = LocationNote::delete_many()
                .filter(location_note::Column::LocationId.eq(&target.id))
                .filter(location_note::Column::Status.eq(NoteStatus::Pending))
                .exec(&txn)
                .await?;

            let updated = Location::update_many()
                .col_expr(location::Column::Difficulty, Expr::value(write.difficulty))
                .col_expr(location::Column::IsApproved, Expr::value(true))
                .col_expr(location::Column::ApprovedAt, Expr::value(now))
                .col_expr(location::Column::UpdatedAt, Expr::value(now))
                .filter(location::Column::Id.eq(&target.id))
                .exec(&txn)
                .await?;

            txn.commit().await?;
            Ok(ApprovalOutcome {
                votes_approved: votes.rows_affected,
                notes_promoted,
                notes_created,
                pending_discarded: discarded.rows_affected,
                updated: updated.rows_affected > 0,
            })
        })
        .await
    }

    /// Delete the unapproved submissions queued under `location_key`.
    pub async fn reject(&self, location_key: &str) -> AppResult<u64> {
        let result = bounded(
            self.timeout,
            VoteSubmission::delete_many()
                .filter(vote_submission::Column::LocationKey.eq(location_key))
                .filter(vote_submission::Column::IsApproved.eq(false))
                .exec(self.db.as_ref()),
        )
        .await?;
        Ok(result.rows_affected)
    }
}
