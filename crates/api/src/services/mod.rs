//! Business services used by route handlers.

pub mod confirmation_template;
pub mod email;
pub mod rsvp;
