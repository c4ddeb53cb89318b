//! Domain layer for the wedding RSVP backend.
//!
//! This crate contains:
//! - Domain models (Rsvp, RsvpStats, submission requests and outcomes)
//! - Input normalization and validation rules
//! - Guest-count computation used by confirmation emails

pub mod models;
