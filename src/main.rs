//! LearnHub Notification Server
//!
//! Main entry point that wires all crates together and starts the server.

use tracing_subscriber::{EnvFilter, fmt};

use learnhub_core::config::AppConfig;
use learnhub_core::error::AppError;
use learnhub_service::notification::sweeper::spawn_expiry_sweeper;

#[tokio::main]
async fn main() {
    let env = std::env::var("LEARNHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting LearnHub notifications v{}", env!("CARGO_PKG_VERSION"));

    // Database connection + migrations
    let db = learnhub_database::DatabasePool::connect(&config.database).await?;
    tracing::info!("Running database migrations...");
    learnhub_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    // Wire services and the realtime engine
    let state = learnhub_api::AppState::new(config.clone(), db.clone());

    // Bridge: domain events → WebSocket pushes
    let bridge_handle = state.realtime.spawn_bridge(&state.notification_service);

    // Periodic global expiry sweep
    let sweeper_handle = spawn_expiry_sweeper(
        state.notification_service.clone(),
        config.notifications.sweep_interval_seconds,
        state.realtime.shutdown_receiver(),
    );

    let realtime = state.realtime.clone();
    let app = learnhub_api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("LearnHub server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // Stop background tasks and drain connections
    realtime.shutdown()?;
    let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);
    let _ = tokio::time::timeout(grace, bridge_handle).await;
    let _ = tokio::time::timeout(grace, sweeper_handle).await;

    db.close().await;
    tracing::info!("LearnHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
