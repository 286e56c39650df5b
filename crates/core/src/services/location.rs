//! Location service: CRUD over location documents.

use std::collections::HashMap;

use battlefield_common::{AppError, AppResult, IdGenerator};
use battlefield_db::{
    entities::{
        location::{self, LocationData},
        location_note::{self, NoteStatus},
        location_vote,
    },
    repositories::{LocationRepository, NoteRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::ensure_id;

/// Initial note content on create: one string or a list of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InitialNotes {
    One(String),
    Many(Vec<String>),
}

impl InitialNotes {
    /// Trimmed, non-blank note texts.
    #[must_use]
    pub fn into_texts(self) -> Vec<String> {
        let texts = match self {
            Self::One(text) => vec![text],
            Self::Many(texts) => texts,
        };
        texts
            .into_iter()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect()
    }
}

/// Input for creating a location.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationInput {
    #[validate(length(min = 1, max = 256))]
    pub key: String,
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(length(max = 64))]
    pub emoji: Option<String>,
    #[validate(length(max = 64))]
    pub difficulty: Option<String>,
    pub location_data: Option<LocationData>,
    pub notes: Option<InitialNotes>,
}

/// Input for updating a location. Only these fields may change.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateLocationInput {
    #[validate(length(min = 1, max = 256))]
    pub key: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,
    #[validate(length(max = 64))]
    pub emoji: Option<String>,
    #[validate(length(max = 64))]
    pub difficulty: Option<String>,
    pub color: Option<String>,
    pub location_data: Option<LocationData>,
}

/// A location with its tallies and notes.
#[derive(Debug, Clone)]
pub struct LocationDocument {
    pub location: location::Model,
    pub votes: Vec<location_vote::Model>,
    pub notes: Vec<location_note::Model>,
    /// `None` once the location is approved and nothing new is pending.
    pub pending_notes: Option<Vec<location_note::Model>>,
}

impl LocationDocument {
    /// Split `notes` into the approved and pending lists.
    #[must_use]
    pub fn assemble(
        location: location::Model,
        votes: Vec<location_vote::Model>,
        notes: Vec<location_note::Model>,
    ) -> Self {
        let (approved, pending): (Vec<_>, Vec<_>) =
            notes.into_iter().partition(location_note::Model::is_approved);

        let pending_notes = if location.is_approved && pending.is_empty() {
            None
        } else {
            Some(pending)
        };

        Self {
            location,
            votes,
            notes: approved,
            pending_notes,
        }
    }
}

/// Location service for business logic.
#[derive(Clone)]
pub struct LocationService {
    location_repo: LocationRepository,
    note_repo: NoteRepository,
    id_gen: IdGenerator,
}

impl LocationService {
    /// Create a new location service.
    #[must_use]
    pub const fn new(location_repo: LocationRepository, note_repo: NoteRepository) -> Self {
        Self {
            location_repo,
            note_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Every location document.
    pub async fn list(&self) -> AppResult<Vec<LocationDocument>> {
        let locations = self.location_repo.find_all().await?;
        let ids: Vec<String> = locations.iter().map(|l| l.id.clone()).collect();

        let mut votes_by_location: HashMap<String, Vec<location_vote::Model>> = HashMap::new();
        for vote in self.location_repo.find_votes_for(&ids).await? {
            votes_by_location
                .entry(vote.location_id.clone())
                .or_default()
                .push(vote);
        }

        let mut notes_by_location: HashMap<String, Vec<location_note::Model>> = HashMap::new();
        for note in self.note_repo.find_by_locations(&ids).await? {
            notes_by_location
                .entry(note.location_id.clone())
                .or_default()
                .push(note);
        }

        Ok(locations
            .into_iter()
            .map(|loc| {
                let votes = votes_by_location.remove(&loc.id).unwrap_or_default();
                let notes = notes_by_location.remove(&loc.id).unwrap_or_default();
                LocationDocument::assemble(loc, votes, notes)
            })
            .collect())
    }

    /// One location document.
    pub async fn get(&self, id: &str) -> AppResult<LocationDocument> {
        let id = ensure_id(id, "location")?;

        let loc = self.location_repo.get_by_id(&id).await?;
        let votes = self.location_repo.find_votes(&id).await?;
        let notes = self.note_repo.find_by_location(&id).await?;

        Ok(LocationDocument::assemble(loc, votes, notes))
    }

    /// Create a location, seeding its pending notes from the initial note content.
    pub async fn create(&self, input: CreateLocationInput) -> AppResult<LocationDocument> {
        input.validate()?;

        let key = input.key.trim().to_string();
        let name = input.name.trim().to_string();
        if key.is_empty() || name.is_empty() {
            return Err(AppError::Validation("key and name are required".to_string()));
        }

        let id = self.id_gen.generate();
        let now = Utc::now();

        let location_data = input
            .location_data
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        let model = location::ActiveModel {
            id: Set(id.clone()),
            key: Set(key),
            name: Set(name),
            emoji: Set(input.emoji.unwrap_or_default()),
            difficulty: Set(input.difficulty.unwrap_or_default()),
            color: Set(location::DEFAULT_COLOR.to_string()),
            location_data: Set(location_data),
            is_approved: Set(false),
            approved_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let notes = input
            .notes
            .map(InitialNotes::into_texts)
            .unwrap_or_default()
            .into_iter()
            .map(|content| location_note::ActiveModel {
                id: Set(self.id_gen.generate()),
                location_id: Set(id.clone()),
                content: Set(content),
                status: Set(NoteStatus::Pending),
                created_at: Set(now.into()),
                approved_at: Set(None),
            })
            .collect();

        let (created, seeded) = self.location_repo.create(model, notes).await?;
        tracing::info!(location_id = %created.id, key = %created.key, "Location created");

        Ok(LocationDocument::assemble(created, Vec::new(), seeded))
    }

    /// Apply the provided fields and stamp `updated_at`.
    pub async fn update(&self, id: &str, input: UpdateLocationInput) -> AppResult<location::Model> {
        let id = ensure_id(id, "location")?;
        input.validate()?;

        if let Some(ref color) = input.color {
            if !is_valid_color(color) {
                return Err(AppError::Validation("Invalid color format".to_string()));
            }
        }
        let key = input.key.as_deref().map(str::trim);
        let name = input.name.as_deref().map(str::trim);
        if key.is_some_and(str::is_empty) || name.is_some_and(str::is_empty) {
            return Err(AppError::Validation("key and name must not be blank".to_string()));
        }

        let existing = self.location_repo.get_by_id(&id).await?;
        let mut active: location::ActiveModel = existing.into();

        if let Some(key) = key {
            active.key = Set(key.to_string());
        }
        if let Some(name) = name {
            active.name = Set(name.to_string());
        }
        if let Some(emoji) = input.emoji {
            active.emoji = Set(emoji);
        }
        if let Some(difficulty) = input.difficulty {
            active.difficulty = Set(difficulty);
        }
        if let Some(color) = input.color {
            active.color = Set(color);
        }
        if let Some(data) = input.location_data {
            active.location_data = Set(Some(serde_json::to_value(&data)?));
        }
        active.updated_at = Set(Utc::now().into());

        self.location_repo.update(active).await
    }

    /// Delete a location.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = ensure_id(id, "location")?;
        self.location_repo.delete(&id).await?;
        tracing::info!(location_id = %id, "Location deleted");
        Ok(())
    }

    /// Vote tallies of a location.
    pub async fn votes(&self, id: &str) -> AppResult<Vec<location_vote::Model>> {
        let id = ensure_id(id, "location")?;
        self.location_repo.get_by_id(&id).await?;
        self.location_repo.find_votes(&id).await
    }
}

/// Validate hex color format.
fn is_valid_color(color: &str) -> bool {
    // Accept formats: #RGB, #RRGGBB
    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}
