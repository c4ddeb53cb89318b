//! HTTP route handlers.

pub mod health;
pub mod rsvp;
pub mod test_email;
