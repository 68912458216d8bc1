//! Connection manager — handles connection lifecycle and message routing.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use learnhub_core::config::RealtimeConfig;
use learnhub_entity::user::UserRole;
use learnhub_service::NotificationService;

use crate::message::{InboundMessage, OutboundMessage};

use super::handle::{ConnectionHandle, ConnectionId};
use super::pool::ConnectionPool;

/// Manages all active WebSocket connections.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Connection pool.
    pool: Arc<ConnectionPool>,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            pool: Arc::new(ConnectionPool::new()),
            config,
        }
    }

    /// Registers a new authenticated connection.
    ///
    /// Returns the connection handle and a receiver for outbound messages.
    pub fn register(
        &self,
        user_id: Uuid,
        role: UserRole,
        username: String,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);

        let handle = Arc::new(ConnectionHandle::new(user_id, role, username, tx));

        // Enforce the per-user device cap by evicting the oldest connection.
        let existing = self.pool.get_user_connections(&user_id);
        if existing.len() >= self.config.max_connections_per_user {
            warn!(
                user_id = %user_id,
                count = existing.len(),
                max = self.config.max_connections_per_user,
                "User at max connections, evicting oldest"
            );
            if let Some(oldest) = existing.first() {
                oldest.mark_dead();
                self.pool.remove(&oldest.id);
            }
        }

        self.pool.add(handle.clone());

        info!(
            conn_id = %handle.id,
            user_id = %user_id,
            "WebSocket connection registered"
        );

        (handle, rx)
    }

    /// Unregisters a connection.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.mark_dead();
            info!(
                conn_id = %conn_id,
                user_id = %handle.user_id,
                "WebSocket connection unregistered"
            );
        }
    }

    /// Processes an inbound frame from a client.
    ///
    /// Read-state requests go through the service, so they persist first;
    /// the resulting domain event then mirrors the transition to the
    /// user's other devices, this one included.
    pub async fn handle_inbound(
        &self,
        conn_id: &ConnectionId,
        raw_message: &str,
        service: &NotificationService,
    ) {
        let handle = match self.pool.get(conn_id) {
            Some(h) => h,
            None => {
                warn!(conn_id = %conn_id, "Message from unknown connection");
                return;
            }
        };

        let msg: InboundMessage = match serde_json::from_str(raw_message) {
            Ok(m) => m,
            Err(e) => {
                handle.send(OutboundMessage::Error {
                    code: "INVALID_MESSAGE".to_string(),
                    message: format!("Failed to parse message: {e}"),
                });
                return;
            }
        };

        match msg {
            InboundMessage::MarkRead { notification_id } => {
                debug!(
                    conn_id = %conn_id,
                    notification_id = %notification_id,
                    "Mark read request"
                );
                // Scoped to the authenticated user; a foreign id is a no-op.
                if let Err(e) = service.mark_read(notification_id, handle.user_id).await {
                    warn!(conn_id = %conn_id, error = %e, "Mark read failed");
                    handle.send(OutboundMessage::Error {
                        code: "MARK_READ_FAILED".to_string(),
                        message: "Could not mark notification as read".to_string(),
                    });
                }
            }
            InboundMessage::MarkAllRead => {
                debug!(conn_id = %conn_id, "Mark all read request");
                if let Err(e) = service.mark_all_read(handle.user_id).await {
                    warn!(conn_id = %conn_id, error = %e, "Mark all read failed");
                    handle.send(OutboundMessage::Error {
                        code: "MARK_ALL_READ_FAILED".to_string(),
                        message: "Could not mark notifications as read".to_string(),
                    });
                }
            }
        }
    }

    /// Pushes a message to every live connection of one user.
    pub fn send_to_user(&self, user_id: &Uuid, message: &OutboundMessage) {
        for conn in self.pool.get_user_connections(user_id) {
            if !conn.send(message.clone()) {
                debug!(conn_id = %conn.id, "Push skipped for dead or saturated connection");
            }
        }
    }

    /// Closes all connections.
    pub fn close_all(&self) {
        let all = self.pool.all_connections();
        for conn in &all {
            conn.mark_dead();
            self.pool.remove(&conn.id);
        }
        info!(count = all.len(), "All connections closed");
    }

    /// Returns the total connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Returns the number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }

    /// Checks if a user is currently connected.
    pub fn is_user_connected(&self, user_id: &Uuid) -> bool {
        !self.pool.get_user_connections(user_id).is_empty()
    }
}
