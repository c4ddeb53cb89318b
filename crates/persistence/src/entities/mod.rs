//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod rsvp;

pub use rsvp::{RsvpEntity, RsvpStatsEntity};
