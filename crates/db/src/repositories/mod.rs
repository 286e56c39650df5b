//! Repository layer for database operations.
//!
//! Every public repository method is one storage operation and is bounded by
//! the repository's operation timeout. Multi-row writes run in a transaction,
//! so a timeout or failure part-way leaves nothing behind.

mod location;
mod moderation;
mod note;

pub use location::LocationRepository;
pub use moderation::{
    ApprovalOutcome, ApprovalWrite, ModerationRepository, RecordedVote, VoteWrite,
};
pub use note::NoteRepository;

use std::future::Future;
use std::time::Duration;

use battlefield_common::{AppError, AppResult};
use sea_orm::DbErr;

/// Default upper bound for a single storage operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Run `op` with a deadline, mapping database failures and expiry to [`AppError`].
///
/// Dropping an unfinished transaction rolls it back.
pub(crate) async fn bounded<T, F>(limit: Duration, op: F) -> AppResult<T>
where
    F: Future<Output = Result<T, DbErr>>,
{
    match tokio::time::timeout(limit, op).await {
        Ok(result) => result.map_err(|e| AppError::Database(e.to_string())),
        Err(_) => {
            tracing::warn!(timeout_secs = limit.as_secs(), "Storage operation timed out");
            Err(AppError::Timeout(limit.as_secs()))
        }
    }
}
