//! Common test utilities for integration tests.
//!
//! Every test gets its own in-memory SQLite database and an in-memory
//! mail transport, so no external services are needed.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;

use wedding_rsvp_api::{
    app::create_app,
    config::{Config, EmailConfig},
    services::email::{EmailService, MockMailTransport},
};

/// Create an in-memory database with the RSVP table.
pub async fn create_test_pool() -> SqlitePool {
    let pool = persistence::db::create_memory_pool()
        .await
        .expect("Failed to open in-memory database");
    persistence::db::initialize_schema(&pool)
        .await
        .expect("Failed to create schema");
    pool
}

/// Test configuration with email credentials set.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.database.url = "sqlite::memory:".to_string();
    config.email = test_email_config();
    config
}

pub fn test_email_config() -> EmailConfig {
    EmailConfig {
        smtp_username: "couple@example.com".to_string(),
        smtp_password: "app-password".to_string(),
        sender_email: "couple@example.com".to_string(),
        ..EmailConfig::default()
    }
}

/// App wired to a recording mail transport.
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub mailer: Arc<MockMailTransport>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_mailer(MockMailTransport::new()).await
    }

    /// App whose confirmation emails always fail.
    pub async fn with_failing_mailer() -> Self {
        Self::with_mailer(MockMailTransport::failing()).await
    }

    async fn with_mailer(mailer: MockMailTransport) -> Self {
        let pool = create_test_pool().await;
        let mailer = Arc::new(mailer);
        let config = test_config();
        let email = EmailService::with_transport(config.email.clone(), mailer.clone());
        let router = create_app(config, pool.clone(), email);

        Self {
            router,
            pool,
            mailer,
        }
    }

    /// App whose database has no rsvps table, so every store call fails.
    pub async fn with_broken_store() -> Self {
        let pool = persistence::db::create_memory_pool()
            .await
            .expect("Failed to open in-memory database");
        let mailer = Arc::new(MockMailTransport::new());
        let config = test_config();
        let email = EmailService::with_transport(config.email.clone(), mailer.clone());
        let router = create_app(config, pool.clone(), email);

        Self {
            router,
            pool,
            mailer,
        }
    }

    /// App without SMTP credentials.
    pub async fn unconfigured() -> Self {
        let pool = create_test_pool().await;
        let config = Config::default();
        let email = EmailService::unconfigured(config.email.clone());
        let router = create_app(config, pool.clone(), email);

        Self {
            router,
            pool,
            mailer: Arc::new(MockMailTransport::new()),
        }
    }
}

/// Create a test application serving static files from `static_dir`.
pub async fn create_test_app_with_static_dir(static_dir: &str) -> Router {
    let pool = create_test_pool().await;
    let mut config = test_config();
    config.server.static_dir = static_dir.to_string();
    let email = EmailService::unconfigured(config.email.clone());
    create_app(config, pool, email)
}

/// Fresh scratch directory under the system temp dir.
pub fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("wedding-rsvp-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir
}

/// Build a JSON POST request.
pub fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a GET request.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "Failed to parse response body: {:?}",
            String::from_utf8_lossy(&body)
        )
    })
}

/// Read a response body as text.
pub async fn response_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&body).into_owned()
}
