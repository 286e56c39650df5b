//! API middleware.

#![allow(missing_docs)]

use battlefield_core::{AdminService, LocationService, ModerationService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub location_service: LocationService,
    pub moderation_service: ModerationService,
    pub admin_service: AdminService,
}
