//! Business logic services.

#![allow(missing_docs)]

pub mod admin;
pub mod location;
pub mod moderation;

pub use admin::AdminService;
pub use location::{
    CreateLocationInput, InitialNotes, LocationDocument, LocationService, UpdateLocationInput,
};
pub use moderation::{
    AddNoteInput, ApprovalSummary, ApproveVotesInput, ModerationService, NoteLists,
    RejectVotesInput, SubmitVoteInput,
};

use battlefield_common::{AppError, AppResult, is_valid_id};

/// Reject identifiers that cannot name any record; returns the stored (lowercase) form.
pub(crate) fn ensure_id(id: &str, what: &str) -> AppResult<String> {
    if is_valid_id(id) {
        Ok(id.to_ascii_lowercase())
    } else {
        Err(AppError::BadRequest(format!("Invalid {what} ID")))
    }
}
