//! Top-level real-time engine.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::info;

use learnhub_core::config::RealtimeConfig;
use learnhub_core::result::AppResult;
use learnhub_service::NotificationService;

use crate::bridge::spawn_event_bridge;
use crate::connection::manager::ConnectionManager;

/// Central real-time engine coordinating the WebSocket gateway.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Configuration.
    config: RealtimeConfig,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine.
    pub fn new(config: RealtimeConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let connections = Arc::new(ConnectionManager::new(config.clone()));

        info!("Real-time engine initialized");

        Self {
            connections,
            config,
            shutdown_tx,
        }
    }

    /// Starts the bridge that subscribes to the service's domain events
    /// and fans them out to connected clients.
    pub fn spawn_bridge(&self, service: &NotificationService) -> JoinHandle<()> {
        spawn_event_bridge(
            self.connections.clone(),
            service.subscribe(),
            self.shutdown_tx.subscribe(),
        )
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Initiates a graceful shutdown of the real-time engine.
    pub fn shutdown(&self) -> AppResult<()> {
        info!("Shutting down real-time engine");

        let _ = self.shutdown_tx.send(());
        self.connections.close_all();

        info!("Real-time engine shut down");
        Ok(())
    }
}
