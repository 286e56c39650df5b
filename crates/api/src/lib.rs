//! HTTP API layer for the battlefield backend.
//!
//! - **Endpoints**: location CRUD, votes, notes, and admin moderation
//! - **Extractors**: admin authentication and JSON bodies with uniform errors
//! - **Middleware**: shared application state
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
