//! Realtime gateway configuration.

use serde::{Deserialize, Serialize};

/// Realtime (WebSocket) gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Maximum WebSocket connections per user.
    #[serde(default = "default_max_connections_per_user")]
    pub max_connections_per_user: usize,
    /// Per-connection outbound message buffer size.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Domain-event broadcast channel capacity.
    #[serde(default = "default_event_buffer")]
    pub event_buffer_size: usize,
    /// Handshake authentication timeout in seconds.
    #[serde(default = "default_auth_timeout")]
    pub auth_timeout_seconds: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            max_connections_per_user: default_max_connections_per_user(),
            channel_buffer_size: default_channel_buffer(),
            event_buffer_size: default_event_buffer(),
            auth_timeout_seconds: default_auth_timeout(),
        }
    }
}

fn default_max_connections_per_user() -> usize {
    5
}

fn default_channel_buffer() -> usize {
    256
}

fn default_event_buffer() -> usize {
    1024
}

fn default_auth_timeout() -> u64 {
    5
}
