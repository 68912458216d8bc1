//! Wire messages exchanged over the WebSocket.
//!
//! Every frame is a JSON object tagged by `type`. Outbound payloads never
//! carry the recipient id; a connection only ever receives its own user's
//! traffic, so the field would be redundant and leak-prone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use learnhub_entity::Notification;

/// Messages a client may send to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Mark a single notification as read.
    MarkRead {
        /// Target notification.
        notification_id: Uuid,
    },
    /// Mark all of the user's notifications as read.
    MarkAllRead,
}

/// Messages the server pushes to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// A new notification was created for this user.
    NewNotification {
        /// Notification id.
        id: Uuid,
        /// Originating user, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        sender_id: Option<Uuid>,
        /// Short headline.
        title: String,
        /// Body text.
        message: String,
        /// Arbitrary structured payload.
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
        /// Deep link into the client.
        #[serde(skip_serializing_if = "Option::is_none")]
        action_url: Option<String>,
        /// Creation time.
        created_at: DateTime<Utc>,
    },
    /// One notification transitioned to read on some device.
    NotificationRead {
        /// The notification that was read.
        notification_id: Uuid,
    },
    /// All of the user's notifications transitioned to read.
    AllNotificationsRead,
    /// The server rejected or failed to process a client frame.
    Error {
        /// Stable machine-readable code.
        code: String,
        /// Human-readable description.
        message: String,
    },
}

impl OutboundMessage {
    /// Builds the push frame for a freshly created notification.
    pub fn from_notification(n: &Notification) -> Self {
        Self::NewNotification {
            id: n.id,
            sender_id: n.sender_id,
            title: n.title.clone(),
            message: n.message.clone(),
            data: n.data.clone(),
            action_url: n.action_url.clone(),
            created_at: n.created_at,
        }
    }
}
