use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use wedding_rsvp_api::{app, config, middleware, services::email::EmailService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!("Starting Wedding RSVP server v{}", env!("CARGO_PKG_VERSION"));

    let db_config = persistence::db::DatabaseConfig::from(&config.database);
    let pool = persistence::db::create_pool(&db_config)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))?;
    info!(url = %config.database.url, "Connected to SQLite database");

    persistence::db::initialize_schema(&pool).await?;

    let email = EmailService::from_config(config.email.clone());
    email.verify_configuration().await;

    let addr = config.socket_addr().context("Invalid server address")?;
    let app = app::create_app(config.clone(), pool.clone(), email);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Wedding RSVP server running on http://{}", addr);
    info!("RSVP page: http://{}/rsvp.html", addr);
    info!("Registry page: http://{}/registry.html", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Database connection closed");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
