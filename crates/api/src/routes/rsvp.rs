//! RSVP submission and admin read endpoints.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::error;

use domain::models::{CreateRsvpRequest, Rsvp, RsvpStats, SubmitRsvpResponse};
use persistence::repositories::RsvpRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services;

/// POST /api/rsvp
///
/// Stores the RSVP, then attempts the confirmation email. A failed email
/// still returns 200 with `emailSent: false` and a warning.
pub async fn submit_rsvp(
    State(state): State<AppState>,
    payload: Result<Json<CreateRsvpRequest>, JsonRejection>,
) -> Result<Json<SubmitRsvpResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let rsvp = request.into_new_rsvp()?;

    let repo = RsvpRepository::new(state.pool.clone());
    let outcome = services::rsvp::submit_rsvp(&repo, &state.email, rsvp)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to save RSVP");
            ApiError::from(e)
        })?;

    Ok(Json(outcome.into()))
}

/// GET /api/rsvps
///
/// Every RSVP, most recent first.
pub async fn list_rsvps(State(state): State<AppState>) -> Result<Json<Vec<Rsvp>>, ApiError> {
    let repo = RsvpRepository::new(state.pool.clone());
    let rsvps = repo.list_all().await.map_err(|e| {
        error!(error = %e, "Failed to retrieve RSVPs");
        ApiError::from(e)
    })?;
    Ok(Json(rsvps))
}

/// GET /api/rsvp-stats
pub async fn rsvp_stats(State(state): State<AppState>) -> Result<Json<RsvpStats>, ApiError> {
    let repo = RsvpRepository::new(state.pool.clone());
    let stats = repo.aggregate_stats().await.map_err(|e| {
        error!(error = %e, "Failed to retrieve statistics");
        ApiError::from(e)
    })?;
    Ok(Json(stats))
}
