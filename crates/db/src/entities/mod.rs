//! Database entities.

#![allow(missing_docs)]

pub mod location;
pub mod location_note;
pub mod location_vote;
pub mod vote_submission;

pub use location::Entity as Location;
pub use location_note::Entity as LocationNote;
pub use location_vote::Entity as LocationVote;
pub use vote_submission::Entity as VoteSubmission;
