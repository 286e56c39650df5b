//! Core business logic for the battlefield backend.

pub mod services;

pub use services::*;
