//! Persistence layer for the wedding RSVP backend.
//!
//! This crate contains:
//! - SQLite connection management and schema initialization
//! - Entity definitions (database row mappings)
//! - Repository implementations

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
