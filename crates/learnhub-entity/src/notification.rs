//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;
/// Maximum message length in characters.
pub const MAX_MESSAGE_LEN: usize = 1000;

/// A notification delivered to a single recipient.
///
/// Bulk-created notifications for the same logical event are independent
/// rows, one per recipient; there is no shared event entity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier, assigned at creation.
    pub id: Uuid,
    /// The recipient user. Required, immutable.
    pub recipient_id: Uuid,
    /// The originating actor, if any. System notifications have no sender.
    pub sender_id: Option<Uuid>,
    /// Short label (≤200 chars).
    pub title: String,
    /// Body text (≤1000 chars).
    pub message: String,
    /// Opaque structured payload used by clients to deep-link or render
    /// type-specific UI.
    pub data: Option<serde_json::Value>,
    /// Optional client-side navigation target.
    pub action_url: Option<String>,
    /// Read flag. One-way transition false → true.
    pub is_read: bool,
    /// Set exactly once, when `is_read` transitions to true.
    pub read_at: Option<DateTime<Utc>>,
    /// Creation timestamp; the sole sort key for listing (descending).
    pub created_at: DateTime<Utc>,
    /// Once passed, the row is eligible for deletion and excluded from
    /// every read path even if physically still present.
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    /// Whether the notification's expiry has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Input for creating a notification.
///
/// `expires_at` left unset gets the configured default expiry (30 days)
/// applied by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// Target user.
    pub recipient_id: Uuid,
    /// Originating actor, if any.
    pub sender_id: Option<Uuid>,
    /// Short label.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Opaque structured payload.
    pub data: Option<serde_json::Value>,
    /// Optional navigation target.
    pub action_url: Option<String>,
    /// Explicit expiry override.
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewNotification {
    /// Creates a minimal input with only the required fields set.
    pub fn new(recipient_id: Uuid, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            recipient_id,
            sender_id: None,
            title: title.into(),
            message: message.into(),
            data: None,
            action_url: None,
            expires_at: None,
        }
    }
}

/// Input for bulk fan-out creation: one independent record per recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkNotification {
    /// Target users. Must be non-empty.
    pub recipient_ids: Vec<Uuid>,
    /// Originating actor, if any.
    pub sender_id: Option<Uuid>,
    /// Short label.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Opaque structured payload.
    pub data: Option<serde_json::Value>,
    /// Optional navigation target.
    pub action_url: Option<String>,
    /// Explicit expiry override.
    pub expires_at: Option<DateTime<Utc>>,
}
