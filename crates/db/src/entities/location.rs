//! Location entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Default display color for new locations.
pub const DEFAULT_COLOR: &str = "#4ECDC4";

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Geometry attached to a location, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LocationData {
    /// A single coordinate.
    Point { coordinates: Coordinates },
    /// A closed shape given by its vertices.
    Polygon { coordinates: Vec<Coordinates> },
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "location")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Human-readable key; vote submissions reference locations through it.
    #[sea_orm(indexed)]
    pub key: String,

    pub name: String,

    pub emoji: String,

    /// Current difficulty label
    pub difficulty: String,

    /// Display color (`#RGB` or `#RRGGBB`)
    pub color: String,

    /// Serialized [`LocationData`]
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub location_data: Option<Json>,

    #[sea_orm(default_value = false)]
    pub is_approved: bool,

    #[sea_orm(nullable)]
    pub approved_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Decode the stored geometry, if any.
    ///
    /// Rows whose JSON no longer matches [`LocationData`] decode as `None`.
    #[must_use]
    pub fn location_data(&self) -> Option<LocationData> {
        self.location_data
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::location_vote::Entity")]
    Votes,

    #[sea_orm(has_many = "super::location_note::Entity")]
    Notes,
}

impl Related<super::location_vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl Related<super::location_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_point_uses_type_tag() {
        let data = LocationData::Point {
            coordinates: Coordinates {
                lat: 52.52,
                lng: 13.405,
            },
        };

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["type"], "point");
        assert_eq!(value["coordinates"]["lat"], 52.52);
    }

    #[test]
    fn test_polygon_decodes_from_wire_shape() {
        let value = json!({
            "type": "polygon",
            "coordinates": [
                {"lat": 1.0, "lng": 2.0},
                {"lat": 3.0, "lng": 4.0},
                {"lat": 5.0, "lng": 6.0}
            ]
        });

        let data: LocationData = serde_json::from_value(value).unwrap();
        match data {
            LocationData::Polygon { coordinates } => assert_eq!(coordinates.len(), 3),
            LocationData::Point { .. } => panic!("expected polygon"),
        }
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let value = json!({"type": "circle", "coordinates": {"lat": 1.0, "lng": 2.0}});
        assert!(serde_json::from_value::<LocationData>(value).is_err());
    }
}
