use serde::Deserialize;
use std::net::{AddrParseError, SocketAddr};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    /// Confirmation email configuration
    #[serde(default)]
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Directory holding the RSVP form, registry and admin pages
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            connect_timeout_secs: config.connect_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// SMTP settings and wedding details used by confirmation emails.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP server host
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// SMTP server port (465 for implicit TLS, 587 for STARTTLS)
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Use STARTTLS instead of implicit TLS
    #[serde(default)]
    pub smtp_starttls: bool,

    /// SMTP username, usually the sender mailbox
    #[serde(default)]
    pub smtp_username: String,

    /// SMTP password or app password
    #[serde(default)]
    pub smtp_password: String,

    /// Sender email address (From header). Falls back to the SMTP username.
    #[serde(default)]
    pub sender_email: String,

    /// Sender name (From header)
    #[serde(default = "default_couple_names")]
    pub sender_name: String,

    #[serde(default = "default_couple_names")]
    pub couple_names: String,

    #[serde(default = "default_wedding_date")]
    pub wedding_date: String,

    /// Address guests can write to for RSVP changes
    #[serde(default = "default_contact_email")]
    pub contact_email: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_starttls: false,
            smtp_username: String::new(),
            smtp_password: String::new(),
            sender_email: String::new(),
            sender_name: default_couple_names(),
            couple_names: default_couple_names(),
            wedding_date: default_wedding_date(),
            contact_email: default_contact_email(),
        }
    }
}

impl EmailConfig {
    /// Whether SMTP credentials are present.
    pub fn credentials_present(&self) -> bool {
        !self.smtp_username.is_empty() && !self.smtp_password.is_empty()
    }

    /// Address used in the From header.
    pub fn from_address(&self) -> &str {
        if self.sender_email.is_empty() {
            &self.smtp_username
        } else {
            &self.sender_email
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_request_timeout() -> u64 {
    30
}
fn default_static_dir() -> String {
    ".".to_string()
}
fn default_database_url() -> String {
    "sqlite://wedding_rsvp.db".to_string()
}
fn default_max_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}
fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}
fn default_smtp_port() -> u16 {
    465
}
fn default_couple_names() -> String {
    "Sarah & Michael".to_string()
}
fn default_wedding_date() -> String {
    "June 15, 2026".to_string()
}
fn default_contact_email() -> String {
    "wedding@sarahandmichael.com".to_string()
}

/// Conventional environment variables mapped onto configuration keys.
/// These take precedence over files and `RSVP__` variables.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("DATABASE_URL", "database.url"),
    ("EMAIL_USER", "email.smtp_username"),
    ("EMAIL_PASSWORD", "email.smtp_password"),
];

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration (optional, every key has a default)
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with RSVP__ prefix
    /// 4. PORT, DATABASE_URL, EMAIL_USER and EMAIL_PASSWORD
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("RSVP").separator("__"));
        let builder = apply_env_aliases(builder, |name| std::env::var(name).ok())?;

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 3000
            request_timeout_secs = 30
            static_dir = "."

            [database]
            url = "sqlite::memory:"
            max_connections = 1
            connect_timeout_secs = 10

            [logging]
            level = "info"
            format = "pretty"

            [security]
            cors_origins = []

            [email]
            smtp_host = "smtp.example.com"
            smtp_port = 465
            sender_name = "Test Couple"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        Ok(cfg)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "RSVP__DATABASE__URL or DATABASE_URL must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "max_connections must be at least 1".to_string(),
            ));
        }

        if self.email.credentials_present() && self.email.smtp_host.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "email.smtp_host must be set when SMTP credentials are provided".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}

/// Overrides configuration keys from the conventional environment variables.
fn apply_env_aliases<F>(mut builder: Builder, lookup: F) -> Result<Builder, config::ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for (variable, key) in ENV_ALIASES {
        builder = builder.set_override_option(*key, lookup(variable))?;
    }
    Ok(builder)
}
