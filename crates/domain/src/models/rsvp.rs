//! RSVP domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationErrors};

/// Attendance value meaning the guest will come.
pub const ATTENDING_YES: &str = "yes";

/// Attendance value meaning the guest declined.
pub const ATTENDING_NO: &str = "no";

/// Returns true when the submitted attendance value confirms attendance.
///
/// Any value other than `"yes"` is treated as not attending.
pub fn is_attending(attending: &str) -> bool {
    attending == ATTENDING_YES
}

/// A persisted RSVP record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rsvp {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub attending: String,
    pub adults: i64,
    pub children: i64,
    pub dietary: Option<String>,
    pub song: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counts over all RSVPs.
///
/// Guest totals only include RSVPs that confirmed attendance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RsvpStats {
    pub total: i64,
    pub attending: i64,
    pub not_attending: i64,
    pub total_adults: i64,
    pub total_children: i64,
}

/// Request body for submitting an RSVP.
///
/// Every field is optional at the wire level so that a missing required field
/// surfaces as a validation error rather than a deserialization failure.
/// Guest counts accept numbers or numeric strings, since HTML forms post text.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateRsvpRequest {
    #[validate(
        required(message = "Name is required"),
        length(min = 1, message = "Name is required")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Email is required"),
        length(min = 1, message = "Email is required")
    )]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    /// Expected to be "yes" or "no"; other non-empty values are accepted.
    #[validate(
        required(message = "Attendance status is required"),
        length(min = 1, message = "Attendance status is required")
    )]
    pub attending: Option<String>,

    #[serde(default, deserialize_with = "deserialize_count")]
    #[validate(range(min = 0, max = 50, message = "Adults must be between 0 and 50"))]
    pub adults: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_count")]
    #[validate(range(min = 0, max = 50, message = "Children must be between 0 and 50"))]
    pub children: Option<i64>,

    #[serde(default)]
    pub dietary: Option<String>,

    #[serde(default)]
    pub song: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

impl CreateRsvpRequest {
    /// Validates the request and normalizes it into an insertable record.
    pub fn into_new_rsvp(self) -> Result<NewRsvp, ValidationErrors> {
        self.validate()?;

        let guests = GuestCount::from_inputs(self.adults, self.children);

        Ok(NewRsvp {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: non_empty(self.phone),
            attending: self.attending.unwrap_or_default(),
            adults: guests.adults,
            children: guests.children,
            dietary: non_empty(self.dietary),
            song: non_empty(self.song),
            message: non_empty(self.message),
        })
    }
}

/// A validated RSVP ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRsvp {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub attending: String,
    pub adults: i64,
    pub children: i64,
    pub dietary: Option<String>,
    pub song: Option<String>,
    pub message: Option<String>,
}

impl NewRsvp {
    pub fn is_attending(&self) -> bool {
        is_attending(&self.attending)
    }

    pub fn guests(&self) -> GuestCount {
        GuestCount {
            adults: self.adults,
            children: self.children,
        }
    }
}

/// Party size of an RSVP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestCount {
    pub adults: i64,
    pub children: i64,
}

impl GuestCount {
    /// Builds a guest count from possibly missing inputs.
    ///
    /// A missing or zero adult count becomes 1 and missing children become 0.
    pub fn from_inputs(adults: Option<i64>, children: Option<i64>) -> Self {
        Self {
            adults: adults.filter(|&n| n != 0).unwrap_or(1),
            children: children.unwrap_or(0),
        }
    }

    pub fn total(&self) -> i64 {
        self.adults.saturating_add(self.children)
    }

    /// Human readable breakdown, e.g. "2 adults, 1 child".
    pub fn describe(&self) -> String {
        let mut text = format!(
            "{} adult{}",
            self.adults,
            if self.adults > 1 { "s" } else { "" }
        );
        if self.children > 0 {
            text.push_str(&format!(
                ", {} child{}",
                self.children,
                if self.children > 1 { "ren" } else { "" }
            ));
        }
        text
    }
}

/// Result of a submission: the write and the confirmation email are reported
/// separately so an email failure never hides a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub id: i64,
    pub persisted: bool,
    pub notified: bool,
    pub notify_error: Option<String>,
}

impl SubmissionOutcome {
    pub fn notified(id: i64) -> Self {
        Self {
            id,
            persisted: true,
            notified: true,
            notify_error: None,
        }
    }

    pub fn notification_failed(id: i64, error: impl Into<String>) -> Self {
        Self {
            id,
            persisted: true,
            notified: false,
            notify_error: Some(error.into()),
        }
    }

    pub fn message(&self) -> &'static str {
        if self.notified {
            "RSVP received successfully"
        } else {
            "RSVP received (email notification failed)"
        }
    }
}

/// Response after submitting an RSVP.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRsvpResponse {
    pub success: bool,
    pub message: String,
    pub id: i64,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<SubmissionOutcome> for SubmitRsvpResponse {
    fn from(outcome: SubmissionOutcome) -> Self {
        Self {
            success: outcome.persisted,
            message: outcome.message().to_string(),
            id: outcome.id,
            email_sent: outcome.notified,
            warning: outcome
                .notify_error
                .map(|err| format!("Confirmation email could not be sent: {}", err)),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Accepts a count as a JSON number, a numeric string, an empty string or null.
/// Anything unparseable is treated as missing.
fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<CountInput>::deserialize(deserializer)?;
    Ok(raw.and_then(|input| match input {
        CountInput::Integer(n) => Some(n),
        CountInput::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        CountInput::Float(_) => None,
        CountInput::Text(s) => s.trim().parse::<i64>().ok(),
    }))
}
