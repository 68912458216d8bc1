//! Domain events emitted by the notification service.
//!
//! The service publishes on a `tokio::sync::broadcast` channel and never
//! waits for delivery; the realtime gateway is the only subscriber that
//! pushes. This keeps "push is best-effort" an architectural property
//! rather than a convention: a create succeeds whether or not anyone is
//! listening.

use tokio::sync::broadcast;
use uuid::Uuid;

use learnhub_entity::notification::Notification;

/// An event describing a change in the notification store.
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    /// A notification was persisted.
    Created(Notification),
    /// A single notification transitioned to read via the mutate surface.
    Read {
        /// The acting recipient.
        recipient_id: Uuid,
        /// The notification that was read.
        notification_id: Uuid,
    },
    /// All of a recipient's notifications transitioned to read.
    AllRead {
        /// The acting recipient.
        recipient_id: Uuid,
    },
}

/// Sender half of the domain-event channel.
pub type EventSender = broadcast::Sender<NotificationEvent>;
/// Receiver half of the domain-event channel.
pub type EventReceiver = broadcast::Receiver<NotificationEvent>;
