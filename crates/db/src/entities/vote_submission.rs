//! Vote submission entity (moderation queue).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single difficulty suggestion awaiting moderation.
///
/// Submissions reference their location by key rather than by ID, and are not
/// removed when the location is deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vote_submission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub location_key: String,

    pub difficulty: String,

    /// Free-text note sent along with the vote
    #[sea_orm(column_type = "Text")]
    pub notes: String,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(default_value = false)]
    pub is_approved: bool,

    #[sea_orm(nullable)]
    pub approved_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
