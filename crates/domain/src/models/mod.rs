//! Domain models for the wedding RSVP backend.

pub mod rsvp;

pub use rsvp::{
    is_attending, CreateRsvpRequest, GuestCount, NewRsvp, Rsvp, RsvpStats, SubmissionOutcome,
    SubmitRsvpResponse, ATTENDING_NO, ATTENDING_YES,
};
