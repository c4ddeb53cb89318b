//! Repository implementations for database operations.

pub mod rsvp;

pub use rsvp::RsvpRepository;
