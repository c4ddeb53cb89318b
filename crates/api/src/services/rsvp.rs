//! RSVP submission flow.
//!
//! The record is written first; the confirmation email is attempted once
//! afterwards and its outcome is reported alongside the assigned id.

use metrics::counter;
use tracing::{info, warn};

use domain::models::{NewRsvp, SubmissionOutcome, ATTENDING_NO, ATTENDING_YES};
use persistence::repositories::RsvpRepository;

use crate::services::email::EmailService;

/// Persist an RSVP and attempt its confirmation email.
///
/// Only storage failures are returned as errors.
pub async fn submit_rsvp(
    repo: &RsvpRepository,
    email: &EmailService,
    rsvp: NewRsvp,
) -> Result<SubmissionOutcome, sqlx::Error> {
    let id = repo.insert(&rsvp).await?;
    info!(rsvp_id = id, attending = %rsvp.attending, "RSVP saved");
    counter!("rsvp_submissions_total", "attending" => attendance_label(&rsvp.attending))
        .increment(1);

    let outcome = match email
        .send_rsvp_confirmation(
            &rsvp.name,
            &rsvp.email,
            &rsvp.attending,
            Some(rsvp.adults),
            Some(rsvp.children),
        )
        .await
    {
        Ok(_) => SubmissionOutcome::notified(id),
        Err(e) => {
            warn!(rsvp_id = id, error = %e, "Confirmation email failed");
            SubmissionOutcome::notification_failed(id, e.to_string())
        }
    };

    let email_outcome = if outcome.notified { "sent" } else { "failed" };
    counter!("rsvp_confirmation_emails_total", "outcome" => email_outcome).increment(1);

    Ok(outcome)
}

/// Bounded label for attendance values, which are free text.
fn attendance_label(attending: &str) -> &'static str {
    match attending {
        ATTENDING_YES => "yes",
        ATTENDING_NO => "no",
        _ => "other",
    }
}
