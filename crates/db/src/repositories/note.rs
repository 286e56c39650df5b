//! Location note repository.

use std::sync::Arc;
use std::time::Duration;

use battlefield_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait, sea_query::Expr,
};

use super::{DEFAULT_OPERATION_TIMEOUT, bounded};
use crate::entities::{Location, LocationNote, location, location_note};

/// Repository for the approved and pending notes of locations.
#[derive(Clone)]
pub struct NoteRepository {
    db: Arc<DatabaseConnection>,
    timeout: Duration,
}

/// Bump `updated_at` of a location, reporting whether it exists.
pub(super) async fn touch_location<C: ConnectionTrait>(
    conn: &C,
    location_id: &str,
) -> Result<bool, DbErr> {
    let result = Location::update_many()
        .col_expr(location::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(location::Column::Id.eq(location_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

impl NoteRepository {
    /// Create a new note repository.
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

    /// Notes of one location, both lists, oldest first.
    pub async fn find_by_location(
        &self,
        location_id: &str,
    ) -> AppResult<Vec<location_note::Model>> {
        bounded(
            self.timeout,
            LocationNote::find()
                .filter(location_note::Column::LocationId.eq(location_id))
                .order_by_asc(location_note::Column::CreatedAt)
                .order_by_asc(location_note::Column::Id)
                .all(self.db.as_ref()),
        )
        .await
    }

    /// Notes of several locations in one query.
    pub async fn find_by_locations(
        &self,
        location_ids: &[String],
    ) -> AppResult<Vec<location_note::Model>> {
        if location_ids.is_empty() {
            return Ok(Vec::new());
        }

        bounded(
            self.timeout,
            LocationNote::find()
                .filter(location_note::Column::LocationId.is_in(location_ids.iter().cloned()))
                .order_by_asc(location_note::Column::CreatedAt)
                .order_by_asc(location_note::Column::Id)
                .all(self.db.as_ref()),
        )
        .await
    }

    /// Attach a note to an existing location and bump the location's `updated_at`.
    pub async fn add(
        &self,
        location_id: &str,
        note: location_note::ActiveModel,
    ) -> AppResult<location_note::Model> {
        let db = self.db.clone();
        let added = bounded(self.timeout, async move {
            let txn = db.begin().await?;

            if !touch_location(&txn, location_id).await? {
                txn.rollback().await?;
                return Ok(None);
            }
            let created = note.insert(&txn).await?;

            txn.commit().await?;
            Ok(Some(created))
        })
        .await?;

        added.ok_or_else(|| AppError::NotFound("Location not found".to_string()))
    }

    /// Remove a note from whichever list holds it.
    pub async fn delete(&self, location_id: &str, note_id: &str) -> AppResult<()> {
        let db = self.db.clone();
        let deleted = bounded(self.timeout, async move {
            let txn = db.begin().await?;

            let result = LocationNote::delete_many()
                .filter(location_note::Column::Id.eq(note_id))
                .filter(location_note::Column::LocationId.eq(location_id))
                .exec(&txn)
                .await?;
            if result.rows_affected == 0 {
                txn.rollback().await?;
                return Ok(false);
            }
            touch_location(&txn, location_id).await?;

            txn.commit().await?;
            Ok(true)
        })
        .await?;

        if deleted {
            Ok(())
        } else {
            Err(AppError::NotFound("Note not found".to_string()))
        }
    }
}
