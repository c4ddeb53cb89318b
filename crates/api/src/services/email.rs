//! Email service for RSVP confirmation emails.
//!
//! Delivery goes through a [`MailTransport`]:
//! - [`SmtpMailTransport`]: sends via an SMTP relay using lettre
//! - [`MockMailTransport`]: records messages in memory (tests and local development)
//!
//! A missing transport means SMTP credentials were not configured; every send
//! then fails with [`EmailError::NotConfigured`] instead of crashing the process.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use domain::models::{is_attending, GuestCount};

use crate::config::EmailConfig;
use crate::services::confirmation_template;

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email credentials not configured")]
    NotConfigured,

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build email: {0}")]
    MessageBuild(String),

    #[error("SMTP transport setup failed: {0}")]
    TransportSetup(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub from: String,
    pub from_name: String,
    /// Recipient email address
    pub to: String,
    /// Recipient name (optional)
    pub to_name: Option<String>,
    pub subject: String,
    pub body_html: String,
}

/// Receipt for a diagnostic test email.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailReceipt {
    pub message_id: String,
    pub from: String,
}

/// Outbound mail delivery.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver a message, returning its Message-ID.
    async fn deliver(&self, message: EmailMessage) -> Result<String, EmailError>;

    /// Check that the transport can reach and authenticate with its server.
    async fn verify(&self) -> Result<(), EmailError>;
}

/// SMTP transport backed by lettre.
///
/// The blocking lettre transport runs on the blocking thread pool.
#[derive(Clone)]
pub struct SmtpMailTransport {
    mailer: SmtpTransport,
}

impl SmtpMailTransport {
    pub fn from_config(config: &EmailConfig) -> Result<Self, EmailError> {
        if !config.credentials_present() {
            return Err(EmailError::NotConfigured);
        }

        let builder = if config.smtp_starttls {
            SmtpTransport::starttls_relay(&config.smtp_host)
        } else {
            SmtpTransport::relay(&config.smtp_host)
        }
        .map_err(|e| EmailError::TransportSetup(format!("SMTP relay error: {e}")))?;

        let mailer = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        Ok(Self { mailer })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn deliver(&self, message: EmailMessage) -> Result<String, EmailError> {
        let from = Mailbox::new(Some(message.from_name), parse_address(&message.from)?);
        let to = Mailbox::new(message.to_name, parse_address(&message.to)?);
        let message_id = format!("<{}@{}>", Uuid::new_v4(), from.email.domain());

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject)
            .message_id(Some(message_id.clone()))
            .header(ContentType::TEXT_HTML)
            .body(message.body_html)
            .map_err(|e| EmailError::MessageBuild(e.to_string()))?;

        let mailer = self.mailer.clone();
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| EmailError::SendFailed(format!("Email task failed: {e}")))?
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        Ok(message_id)
    }

    async fn verify(&self) -> Result<(), EmailError> {
        let mailer = self.mailer.clone();
        let connected = tokio::task::spawn_blocking(move || mailer.test_connection())
            .await
            .map_err(|e| EmailError::SendFailed(format!("Email task failed: {e}")))?
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        if connected {
            Ok(())
        } else {
            Err(EmailError::SendFailed(
                "SMTP server refused the connection".to_string(),
            ))
        }
    }
}

fn parse_address(address: &str) -> Result<Address, EmailError> {
    address
        .parse()
        .map_err(|e| EmailError::InvalidAddress(format!("{address}: {e}")))
}

/// In-memory transport that records messages instead of sending them.
#[derive(Debug, Default)]
pub struct MockMailTransport {
    /// Whether to simulate delivery failures.
    simulate_failure: bool,
    sent: Mutex<Vec<EmailMessage>>,
}

impl MockMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock transport whose deliveries always fail.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Messages delivered so far.
    pub fn sent_messages(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn deliver(&self, message: EmailMessage) -> Result<String, EmailError> {
        if self.simulate_failure {
            warn!(to = %message.to, "Mock mail transport simulating failure");
            return Err(EmailError::SendFailed("Simulated failure".to_string()));
        }

        info!(
            to = %message.to,
            subject = %message.subject,
            "Mock: Would send email"
        );

        let message_id = format!("<{}@mock.local>", Uuid::new_v4());
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message);
        }
        Ok(message_id)
    }

    async fn verify(&self) -> Result<(), EmailError> {
        if self.simulate_failure {
            Err(EmailError::SendFailed("Simulated failure".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Email service for RSVP confirmations.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    transport: Option<Arc<dyn MailTransport>>,
}

impl EmailService {
    /// Creates the service with an SMTP transport when credentials are present.
    pub fn from_config(config: EmailConfig) -> Self {
        let smtp = SmtpMailTransport::from_config(&config);
        let transport: Option<Arc<dyn MailTransport>> = match smtp {
            Ok(smtp) => Some(Arc::new(smtp)),
            Err(EmailError::NotConfigured) => {
                warn!("SMTP credentials not set, confirmation emails are disabled");
                None
            }
            Err(e) => {
                error!(error = %e, "Failed to set up SMTP transport");
                None
            }
        };

        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// Creates the service with an explicit transport.
    pub fn with_transport(config: EmailConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport: Some(transport),
        }
    }

    /// Creates a service that has no transport.
    pub fn unconfigured(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
            transport: None,
        }
    }

    /// Whether emails can be sent at all.
    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    /// Address used in the From header.
    pub fn sender_address(&self) -> &str {
        self.config.from_address()
    }

    async fn send(&self, message: EmailMessage) -> Result<String, EmailError> {
        let transport = self.transport.as_ref().ok_or(EmailError::NotConfigured)?;
        transport.deliver(message).await
    }

    fn message_to(
        &self,
        to: &str,
        to_name: Option<&str>,
        subject: String,
        body_html: String,
    ) -> EmailMessage {
        EmailMessage {
            from: self.config.from_address().to_string(),
            from_name: self.config.sender_name.clone(),
            to: to.to_string(),
            to_name: to_name.map(|n| n.to_string()),
            subject,
            body_html,
        }
    }

    /// Send the RSVP confirmation to the guest.
    ///
    /// Missing guest counts fall back to one adult and no children.
    pub async fn send_rsvp_confirmation(
        &self,
        name: &str,
        email: &str,
        attending: &str,
        adults: Option<i64>,
        children: Option<i64>,
    ) -> Result<String, EmailError> {
        let attending = is_attending(attending);
        let guests = GuestCount::from_inputs(adults, children);

        let message = self.message_to(
            email,
            Some(name),
            confirmation_template::confirmation_subject(&self.config, attending),
            confirmation_template::confirmation_html(&self.config, name, attending, guests),
        );

        let message_id = self.send(message).await?;
        info!(to = %email, message_id = %message_id, "Confirmation email sent");
        Ok(message_id)
    }

    /// Send a diagnostic email to the sender address itself.
    pub async fn send_test_email(&self) -> Result<TestEmailReceipt, EmailError> {
        if !self.is_configured() {
            return Err(EmailError::NotConfigured);
        }

        let from = self.config.from_address().to_string();
        let message = self.message_to(
            &from,
            Some(&self.config.sender_name),
            confirmation_template::test_email_subject(&self.config),
            confirmation_template::test_email_html(&self.config),
        );

        let message_id = self.send(message).await?;
        info!(to = %from, message_id = %message_id, "Test email sent");
        Ok(TestEmailReceipt { message_id, from })
    }

    /// Check the transport once at startup. Never fails startup.
    pub async fn verify_configuration(&self) -> bool {
        let Some(transport) = &self.transport else {
            warn!("Email service not configured; RSVPs will be stored without confirmation emails");
            return false;
        };

        match transport.verify().await {
            Ok(()) => {
                info!(from = %self.sender_address(), "Email server is ready to send messages");
                true
            }
            Err(e) => {
                error!(error = %e, "Email configuration error");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmailConfig {
        EmailConfig {
            smtp_username: "couple@example.com".to_string(),
            smtp_password: "app-password".to_string(),
            ..EmailConfig::default()
        }
    }

    #[test]
    fn test_unconfigured_without_credentials() {
        let service = EmailService::from_config(EmailConfig::default());
        assert!(!service.is_configured());
    }

    #[test]
    fn test_smtp_transport_requires_credentials() {
        let result = SmtpMailTransport::from_config(&EmailConfig::default());
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_send_confirmation_without_transport() {
        let service = EmailService::unconfigured(test_config());
        let result = service
            .send_rsvp_confirmation("Ada", "ada@example.com", "yes", Some(2), None)
            .await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_send_attending_confirmation() {
        let transport = Arc::new(MockMailTransport::new());
        let service = EmailService::with_transport(test_config(), transport.clone());

        let message_id = service
            .send_rsvp_confirmation("Ada", "ada@example.com", "yes", Some(2), Some(1))
            .await
            .unwrap();
        assert!(message_id.starts_with('<'));

        let sent = transport.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ada@example.com");
        assert_eq!(sent[0].to_name.as_deref(), Some("Ada"));
        assert_eq!(sent[0].from, "couple@example.com");
        assert_eq!(sent[0].from_name, "Sarah & Michael");
        assert!(sent[0].subject.starts_with("✓ RSVP Confirmed"));
        assert!(sent[0].body_html.contains("Number of Guests: 3"));
    }

    #[tokio::test]
    async fn test_send_declined_confirmation() {
        let transport = Arc::new(MockMailTransport::new());
        let service = EmailService::with_transport(test_config(), transport.clone());

        service
            .send_rsvp_confirmation("Ada", "ada@example.com", "no", None, None)
            .await
            .unwrap();

        let sent = transport.sent_messages();
        assert!(sent[0].subject.starts_with("RSVP Received"));
    }

    #[tokio::test]
    async fn test_delivery_failure_is_reported() {
        let service =
            EmailService::with_transport(test_config(), Arc::new(MockMailTransport::failing()));
        let result = service
            .send_rsvp_confirmation("Ada", "ada@example.com", "yes", None, None)
            .await;
        assert!(matches!(result, Err(EmailError::SendFailed(_))));
    }

    #[tokio::test]
    async fn test_send_test_email_to_sender() {
        let transport = Arc::new(MockMailTransport::new());
        let service = EmailService::with_transport(test_config(), transport.clone());

        let receipt = service.send_test_email().await.unwrap();
        assert_eq!(receipt.from, "couple@example.com");

        let sent = transport.sent_messages();
        assert_eq!(sent[0].to, "couple@example.com");
    }

    #[tokio::test]
    async fn test_send_test_email_unconfigured() {
        let service = EmailService::unconfigured(EmailConfig::default());
        assert!(matches!(
            service.send_test_email().await,
            Err(EmailError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_verify_configuration() {
        let ok = EmailService::with_transport(test_config(), Arc::new(MockMailTransport::new()));
        assert!(ok.verify_configuration().await);

        let failing =
            EmailService::with_transport(test_config(), Arc::new(MockMailTransport::failing()));
        assert!(!failing.verify_configuration().await);

        let unconfigured = EmailService::unconfigured(EmailConfig::default());
        assert!(!unconfigured.verify_configuration().await);
    }

    #[tokio::test]
    async fn test_smtp_deliver_rejects_invalid_recipient() {
        let transport = SmtpMailTransport::from_config(&test_config()).unwrap();
        let result = transport
            .deliver(EmailMessage {
                from: "couple@example.com".to_string(),
                from_name: "Couple".to_string(),
                to: "not-an-address".to_string(),
                to_name: None,
                subject: "Hi".to_string(),
                body_html: "<p>Hi</p>".to_string(),
            })
            .await;
        assert!(matches!(result, Err(EmailError::InvalidAddress(_))));
    }
}
