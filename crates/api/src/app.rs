use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{health, rsvp, test_email};
use crate::services::email::EmailService;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub email: EmailService,
}

pub fn create_app(config: Config, pool: SqlitePool, email: EmailService) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        email,
    };

    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api_routes = Router::new()
        .route("/api/rsvp", post(rsvp::submit_rsvp))
        .route("/api/rsvps", get(rsvp::list_rsvps))
        .route("/api/rsvp-stats", get(rsvp::rsvp_stats))
        .route("/api/test-email", get(test_email::send_test_email));

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics_handler));

    // Wedding site pages (index.html, rsvp.html, registry.html, assets)
    let static_files = ServeDir::new(&config.server.static_dir);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .fallback_service(static_files)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
