//! Request DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use learnhub_entity::{BulkNotification, NewNotification};

/// Body for `POST /api/notifications`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    /// Recipient user ID.
    pub recipient_id: Uuid,
    /// Short headline.
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    /// Body text.
    #[validate(length(min = 1, max = 1000, message = "message must be 1-1000 characters"))]
    pub message: String,
    /// Arbitrary structured payload.
    pub data: Option<serde_json::Value>,
    /// Deep link into the client.
    pub action_url: Option<String>,
    /// Explicit expiry; defaults server-side when omitted.
    pub expires_at: Option<DateTime<Utc>>,
}

impl CreateNotificationRequest {
    /// Converts to the service input, stamping the acting sender.
    pub fn into_new_notification(self, sender_id: Uuid) -> NewNotification {
        NewNotification {
            recipient_id: self.recipient_id,
            sender_id: Some(sender_id),
            title: self.title,
            message: self.message,
            data: self.data,
            action_url: self.action_url,
            expires_at: self.expires_at,
        }
    }
}

/// Body for `POST /api/notifications/bulk`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkCreateNotificationRequest {
    /// Recipient user IDs; one independent notification is created per entry.
    #[validate(length(min = 1, message = "recipient_ids must not be empty"))]
    pub recipient_ids: Vec<Uuid>,
    /// Short headline.
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    /// Body text.
    #[validate(length(min = 1, max = 1000, message = "message must be 1-1000 characters"))]
    pub message: String,
    /// Arbitrary structured payload.
    pub data: Option<serde_json::Value>,
    /// Deep link into the client.
    pub action_url: Option<String>,
    /// Explicit expiry; defaults server-side when omitted.
    pub expires_at: Option<DateTime<Utc>>,
}

impl BulkCreateNotificationRequest {
    /// Converts to the service input, stamping the acting sender.
    pub fn into_bulk_notification(self, sender_id: Uuid) -> BulkNotification {
        BulkNotification {
            recipient_ids: self.recipient_ids,
            sender_id: Some(sender_id),
            title: self.title,
            message: self.message,
            data: self.data,
            action_url: self.action_url,
            expires_at: self.expires_at,
        }
    }
}
