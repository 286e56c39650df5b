//! Location note entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which list of the location a note currently lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum NoteStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
}

/// Free-text annotation on a location.
///
/// A single status column keeps each note in exactly one of the approved and
/// pending lists; promotion rewrites the status in place.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "location_note")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub location_id: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    pub status: NoteStatus,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub approved_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether this note is in the approved list.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.status == NoteStatus::Approved
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_delete = "Cascade"
    )]
    Location,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
