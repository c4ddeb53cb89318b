//! Diagnostic endpoint for checking outbound email.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

use crate::app::AppState;
use crate::services::email::EmailError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailResponse {
    pub success: bool,
    pub message: String,
    pub message_id: String,
    pub from: String,
}

#[derive(Debug, Serialize)]
pub struct TestEmailFailure {
    pub success: bool,
    pub error: String,
    pub hint: String,
}

impl TestEmailFailure {
    fn new(error: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            hint: hint.into(),
        }
    }
}

/// GET /api/test-email
///
/// Sends a message to the configured sender address.
/// Returns 503 when credentials are missing and 500 when delivery fails.
pub async fn send_test_email(
    State(state): State<AppState>,
) -> Result<Json<TestEmailResponse>, (StatusCode, Json<TestEmailFailure>)> {
    match state.email.send_test_email().await {
        Ok(receipt) => Ok(Json(TestEmailResponse {
            success: true,
            message: format!("Test email sent to {}", receipt.from),
            message_id: receipt.message_id,
            from: receipt.from,
        })),
        Err(EmailError::NotConfigured) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(TestEmailFailure::new(
                EmailError::NotConfigured.to_string(),
                "Set EMAIL_USER and EMAIL_PASSWORD (or RSVP__EMAIL__SMTP_USERNAME and RSVP__EMAIL__SMTP_PASSWORD) and restart the server",
            )),
        )),
        Err(e) => {
            warn!(error = %e, "Test email failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TestEmailFailure::new(
                    e.to_string(),
                    "Check the SMTP host and port, and use an app password if your provider requires one",
                )),
            ))
        }
    }
}
