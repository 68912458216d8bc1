//! Application state shared across all handlers.

use std::sync::Arc;

use learnhub_auth::jwt::JwtDecoder;
use learnhub_core::config::AppConfig;
use learnhub_database::{DatabasePool, NotificationRepository};
use learnhub_realtime::RealtimeEngine;
use learnhub_service::NotificationService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool
    pub db: DatabasePool,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Notification service
    pub notification_service: NotificationService,
    /// WebSocket realtime engine
    pub realtime: Arc<RealtimeEngine>,
}

impl AppState {
    /// Wires the full dependency graph from configuration and a pool.
    pub fn new(config: AppConfig, db: DatabasePool) -> Self {
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        let repository = NotificationRepository::new(db.pool().clone());
        let notification_service = NotificationService::new(
            Arc::new(repository),
            config.notifications.clone(),
            config.realtime.event_buffer_size,
        );

        let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone()));

        Self {
            config: Arc::new(config),
            db,
            jwt_decoder,
            notification_service,
            realtime,
        }
    }
}
