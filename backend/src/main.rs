//! To-do service backend
//!
//! Users register, sign in for a bearer token and manage their own todos.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! - Routes: HTTP request handling, validation and the auth gate
//! - Services: Business logic
//! - Repositories: Data access (PostgreSQL or in-memory)

use anyhow::Result;
use tokio::signal;
use todo_backend::{config, db, routes, state::AppState, telemetry};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting to-do backend"
    );

    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    let state = if config.database.is_memory() {
        warn!("Using the in-memory store; data is lost on shutdown");
        AppState::in_memory(config.clone())
    } else {
        info!("Connecting to database...");
        let db_pool = db::create_pool(&config.database.url, config.database.max_connections).await?;

        // Production runs migrations as a separate job
        if !config::AppConfig::is_production() {
            db::run_migrations(&db_pool).await?;
        }

        AppState::new(db_pool, config.clone())
    };

    let state = match telemetry::install_recorder() {
        Ok(handle) => state.with_metrics(handle),
        Err(e) => {
            warn!("{}. Metrics will be disabled.", e);
            state
        }
    };

    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "todo_backend=info,tower_http=info".into()
        } else {
            "todo_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Refuse to start in production with development settings
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let issues = config.production_issues();

    if config.database.url.contains("localhost") || config.database.url.contains("127.0.0.1") {
        warn!("Database URL contains localhost - ensure this is intentional for production");
    }

    if !issues.is_empty() {
        for issue in &issues {
            error!("Configuration error: {}", issue);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
