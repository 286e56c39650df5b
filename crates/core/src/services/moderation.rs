//! Moderation workflow: votes, notes, and the approve/reject transitions.
//!
//! Votes and notes enter as pending suggestions. Approval promotes them into
//! the location record; rejection deletes them. Both transitions are terminal.

use battlefield_common::{AppError, AppResult, IdGenerator, is_valid_id};
use battlefield_db::{
    entities::{
        location,
        location_note::{self, NoteStatus},
        vote_submission,
    },
    repositories::{
        ApprovalWrite, LocationRepository, ModerationRepository, NoteRepository, RecordedVote,
        VoteWrite,
    },
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::ensure_id;

/// Input for voting on a location's difficulty.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVoteInput {
    #[validate(length(max = 64))]
    pub difficulty: String,
    #[validate(length(max = 2048))]
    pub notes: Option<String>,
}

/// Input for attaching a note to a location.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddNoteInput {
    #[validate(length(max = 2048))]
    pub content: String,
}

/// Input for approving the votes of a location.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApproveVotesInput {
    /// Location ID or key.
    pub location_id: String,
    #[validate(length(max = 64))]
    pub difficulty: String,
    /// Free-text notes to add as approved.
    #[serde(default)]
    pub notes: Vec<String>,
    /// Pending notes to promote.
    #[serde(default)]
    pub note_ids: Vec<String>,
}

/// Input for rejecting the votes of a location.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectVotesInput {
    /// Location ID or key.
    pub location_id: String,
}

/// Result of an approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalSummary {
    pub updated: bool,
    /// Approved notes created or promoted.
    pub notes_added: u64,
    pub votes_approved: u64,
}

/// A location's notes split by list.
#[derive(Debug, Clone)]
pub struct NoteLists {
    pub notes: Vec<location_note::Model>,
    pub pending_notes: Vec<location_note::Model>,
}

/// Moderation service for votes and notes.
#[derive(Clone)]
pub struct ModerationService {
    moderation_repo: ModerationRepository,
    location_repo: LocationRepository,
    note_repo: NoteRepository,
    id_gen: IdGenerator,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(
        moderation_repo: ModerationRepository,
        location_repo: LocationRepository,
        note_repo: NoteRepository,
    ) -> Self {
        Self {
            moderation_repo,
            location_repo,
            note_repo,
            id_gen: IdGenerator::new(),
        }
    }

    fn pending_note(&self, location_id: &str, content: String) -> location_note::ActiveModel {
        location_note::ActiveModel {
            id: Set(self.id_gen.generate()),
            location_id: Set(location_id.to_string()),
            content: Set(content),
            status: Set(NoteStatus::Pending),
            created_at: Set(Utc::now().into()),
            approved_at: Set(None),
        }
    }

    // ========== Votes ==========

    /// Count a vote and queue it for moderation, with an optional pending note.
    pub async fn submit_vote(
        &self,
        location_id: &str,
        input: SubmitVoteInput,
    ) -> AppResult<RecordedVote> {
        let location_id = ensure_id(location_id, "location")?;
        input.validate()?;

        let difficulty = input.difficulty.trim().to_string();
        if difficulty.is_empty() {
            return Err(AppError::BadRequest("Difficulty is required".to_string()));
        }

        let notes = input.notes.unwrap_or_default();
        let note_text = notes.trim();
        let pending_note = if note_text.is_empty() {
            None
        } else {
            Some(self.pending_note(&location_id, note_text.to_string()))
        };

        let recorded = self
            .moderation_repo
            .record_vote(VoteWrite {
                location_id: location_id.clone(),
                difficulty,
                tally_id: self.id_gen.generate(),
                submission_id: self.id_gen.generate(),
                notes,
                pending_note,
            })
            .await?;

        tracing::info!(
            location_id = %location_id,
            difficulty = %recorded.tally.difficulty,
            count = recorded.tally.count,
            "Vote recorded"
        );
        Ok(recorded)
    }

    /// Every unapproved vote submission, oldest first.
    pub async fn list_pending_votes(&self) -> AppResult<Vec<vote_submission::Model>> {
        self.moderation_repo.find_pending().await
    }

    /// Look a location up by ID, then by key.
    async fn resolve_location(&self, location_ref: &str) -> AppResult<Option<location::Model>> {
        if is_valid_id(location_ref) {
            let by_id = self
                .location_repo
                .find_by_id(&location_ref.to_ascii_lowercase())
                .await?;
            if by_id.is_some() {
                return Ok(by_id);
            }
        }
        self.location_repo.find_by_key(location_ref).await
    }

    /// Approve a location's pending votes, set its difficulty, and settle its notes.
    ///
    /// Listed pending notes are promoted, non-blank `notes` texts become new
    /// approved notes, and whatever is still pending afterwards is discarded.
    pub async fn approve_votes(&self, input: ApproveVotesInput) -> AppResult<ApprovalSummary> {
        input.validate()?;

        let location_ref = input.location_id.trim();
        if location_ref.is_empty() {
            return Err(AppError::BadRequest("locationId is required".to_string()));
        }
        let difficulty = input.difficulty.trim().to_string();
        if difficulty.is_empty() {
            return Err(AppError::BadRequest("Difficulty is required".to_string()));
        }

        let target = self
            .resolve_location(location_ref)
            .await?
            .ok_or_else(|| AppError::NotFound("Location not found".to_string()))?;

        let now = Utc::now();
        let new_notes = input
            .notes
            .iter()
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
            .map(|text| location_note::ActiveModel {
                id: Set(self.id_gen.generate()),
                location_id: Set(target.id.clone()),
                content: Set(text.to_string()),
                status: Set(NoteStatus::Approved),
                created_at: Set(now.into()),
                approved_at: Set(Some(now.into())),
            })
            .collect();

        let outcome = self
            .moderation_repo
            .approve(
                &target,
                ApprovalWrite {
                    difficulty,
                    promote_note_ids: input.note_ids,
                    new_notes,
                },
            )
            .await?;

        tracing::info!(
            location_id = %target.id,
            votes_approved = outcome.votes_approved,
            notes_promoted = outcome.notes_promoted,
            pending_discarded = outcome.pending_discarded,
            "Votes approved"
        );

        Ok(ApprovalSummary {
            updated: outcome.updated,
            notes_added: outcome.notes_promoted + outcome.notes_created.len() as u64,
            votes_approved: outcome.votes_approved,
        })
    }

    /// Delete a location's pending votes. Returns how many were removed.
    ///
    /// An unknown reference is treated as a key and simply matches nothing.
    pub async fn reject_votes(&self, input: RejectVotesInput) -> AppResult<u64> {
        let location_ref = input.location_id.trim();
        if location_ref.is_empty() {
            return Err(AppError::BadRequest("locationId is required".to_string()));
        }

        let key = match self.resolve_location(location_ref).await? {
            Some(target) => target.key,
            None => location_ref.to_string(),
        };

        let deleted = self.moderation_repo.reject(&key).await?;
        tracing::info!(location_key = %key, deleted, "Votes rejected");
        Ok(deleted)
    }

    // ========== Notes ==========

    /// Attach a pending note to a location.
    pub async fn add_note(
        &self,
        location_id: &str,
        input: AddNoteInput,
    ) -> AppResult<location_note::Model> {
        let location_id = ensure_id(location_id, "location")?;
        input.validate()?;

        let content = input.content.trim();
        if content.is_empty() {
            return Err(AppError::BadRequest("Note content is required".to_string()));
        }

        let note = self.pending_note(&location_id, content.to_string());
        self.note_repo.add(&location_id, note).await
    }

    /// Approved and pending notes of a location.
    pub async fn list_notes(&self, location_id: &str) -> AppResult<NoteLists> {
        let location_id = ensure_id(location_id, "location")?;
        self.location_repo.get_by_id(&location_id).await?;

        let (notes, pending_notes) = self
            .note_repo
            .find_by_location(&location_id)
            .await?
            .into_iter()
            .partition(location_note::Model::is_approved);

        Ok(NoteLists {
            notes,
            pending_notes,
        })
    }

    /// Remove a note from whichever list holds it.
    pub async fn delete_note(&self, location_id: &str, note_id: &str) -> AppResult<()> {
        let location_id = ensure_id(location_id, "location")?;
        let note_id = ensure_id(note_id, "note")?;
        self.note_repo.delete(&location_id, &note_id).await
    }
}
