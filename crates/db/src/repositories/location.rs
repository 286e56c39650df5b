//! Location repository.

use std::sync::Arc;
use std::time::Duration;

use battlefield_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use super::{DEFAULT_OPERATION_TIMEOUT, bounded};
use crate::entities::{Location, LocationVote, location, location_note, location_vote};

/// Repository for locations and their vote tallies.
#[derive(Clone)]
pub struct LocationRepository {
    db: Arc<DatabaseConnection>,
    timeout: Duration,
}

impl LocationRepository {
    /// Create a new location repository.
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

    /// All locations, oldest first.
    pub async fn find_all(&self) -> AppResult<Vec<location::Model>> {
        bounded(
            self.timeout,
            Location::find()
                .order_by_asc(location::Column::CreatedAt)
                .order_by_asc(location::Column::Id)
                .all(self.db.as_ref()),
        )
        .await
    }

    /// Find location by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<location::Model>> {
        bounded(self.timeout, Location::find_by_id(id).one(self.db.as_ref())).await
    }

    /// Get location by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<location::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Location not found".to_string()))
    }

    /// Find the oldest location carrying `key`.
    pub async fn find_by_key(&self, key: &str) -> AppResult<Option<location::Model>> {
        bounded(
            self.timeout,
            Location::find()
                .filter(location::Column::Key.eq(key))
                .order_by_asc(location::Column::CreatedAt)
                .one(self.db.as_ref()),
        )
        .await
    }

    /// Insert a location together with its seed notes.
    pub async fn create(
        &self,
        model: location::ActiveModel,
        notes: Vec<location_note::ActiveModel>,
    ) -> AppResult<(location::Model, Vec<location_note::Model>)> {
        let db = self.db.clone();
        bounded(self.timeout, async move {
            let txn = db.begin().await?;

            let created = model.insert(&txn).await?;
            let mut seeded = Vec::with_capacity(notes.len());
            for note in notes {
                seeded.push(note.insert(&txn).await?);
            }

            txn.commit().await?;
            Ok((created, seeded))
        })
        .await
    }

    /// Persist changed columns of a location.
    pub async fn update(&self, model: location::ActiveModel) -> AppResult<location::Model> {
        bounded(self.timeout, model.update(self.db.as_ref())).await
    }

    /// Delete a location; its tallies and notes go with it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = bounded(self.timeout, Location::delete_by_id(id).exec(self.db.as_ref())).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Location not found".to_string()));
        }
        Ok(())
    }

    // ==================== Tallies ====================

    /// Vote tallies of one location.
    pub async fn find_votes(&self, location_id: &str) -> AppResult<Vec<location_vote::Model>> {
        bounded(
            self.timeout,
            LocationVote::find()
                .filter(location_vote::Column::LocationId.eq(location_id))
                .order_by_asc(location_vote::Column::CreatedAt)
                .order_by_asc(location_vote::Column::Id)
                .all(self.db.as_ref()),
        )
        .await
    }

    /// Vote tallies of several locations in one query.
    pub async fn find_votes_for(
        &self,
        location_ids: &[String],
    ) -> AppResult<Vec<location_vote::Model>> {
        if location_ids.is_empty() {
            return Ok(Vec::new());
        }

        bounded(
            self.timeout,
            LocationVote::find()
                .filter(location_vote::Column::LocationId.is_in(location_ids.iter().cloned()))
                .order_by_asc(location_vote::Column::CreatedAt)
                .order_by_asc(location_vote::Column::Id)
                .all(self.db.as_ref()),
        )
        .await
    }
}
