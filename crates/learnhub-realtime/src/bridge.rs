//! Bridge task: domain events → WebSocket pushes.
//!
//! The sole subscriber that turns [`NotificationEvent`]s into outbound
//! frames. Because it runs after persistence on a lossy broadcast channel,
//! a lagging or absent bridge degrades delivery, never durability.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use learnhub_service::notification::events::{EventReceiver, NotificationEvent};

use crate::connection::manager::ConnectionManager;
use crate::message::OutboundMessage;

/// Spawns the event bridge. Runs until the event channel closes or a
/// shutdown signal arrives.
pub fn spawn_event_bridge(
    connections: Arc<ConnectionManager>,
    mut events: EventReceiver,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Realtime event bridge started");
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(event) => dispatch(&connections, event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Dropped pushes are acceptable; clients reconcile via REST.
                        warn!(skipped, "Event bridge lagged, pushes dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("Event channel closed, bridge stopping");
                        break;
                    }
                },
                _ = shutdown.recv() => {
                    info!("Realtime event bridge stopped");
                    break;
                }
            }
        }
    })
}

fn dispatch(connections: &ConnectionManager, event: NotificationEvent) {
    match event {
        NotificationEvent::Created(notification) => {
            debug!(
                notification_id = %notification.id,
                recipient_id = %notification.recipient_id,
                "Pushing new notification"
            );
            connections.send_to_user(
                &notification.recipient_id,
                &OutboundMessage::from_notification(&notification),
            );
        }
        NotificationEvent::Read {
            recipient_id,
            notification_id,
        } => {
            connections.send_to_user(
                &recipient_id,
                &OutboundMessage::NotificationRead { notification_id },
            );
        }
        NotificationEvent::AllRead { recipient_id } => {
            connections.send_to_user(&recipient_id, &OutboundMessage::AllNotificationsRead);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use learnhub_core::config::RealtimeConfig;
    use learnhub_entity::Notification;
    use learnhub_entity::user::UserRole;
    use uuid::Uuid;

    fn notification_for(recipient_id: Uuid) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient_id,
            sender_id: None,
            title: "New course".into(),
            message: "Check it out".into(),
            data: None,
            action_url: None,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
            expires_at: Utc::now() + chrono::Duration::days(30),
        }
    }

    #[tokio::test]
    async fn test_created_event_reaches_all_devices() {
        let connections = Arc::new(ConnectionManager::new(RealtimeConfig::default()));
        let (events_tx, events_rx) = broadcast::channel(16);
        let (shutdown_tx, _) = broadcast::channel(1);

        let user = Uuid::new_v4();
        let (_, mut rx_a) = connections.register(user, UserRole::Student, "dana".into());
        let (_, mut rx_b) = connections.register(user, UserRole::Student, "dana".into());

        let bridge = spawn_event_bridge(connections, events_rx, shutdown_tx.subscribe());

        let n = notification_for(user);
        events_tx.send(NotificationEvent::Created(n.clone())).unwrap();

        for rx in [&mut rx_a, &mut rx_b] {
            match rx.recv().await.unwrap() {
                OutboundMessage::NewNotification { id, .. } => assert_eq!(id, n.id),
                other => panic!("unexpected frame: {other:?}"),
            }
        }

        drop(events_tx);
        bridge.await.unwrap();
    }

    #[tokio::test]
    async fn test_read_event_targets_recipient_only() {
        let connections = Arc::new(ConnectionManager::new(RealtimeConfig::default()));
        let (events_tx, events_rx) = broadcast::channel(16);
        let (shutdown_tx, _) = broadcast::channel(1);

        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let (_, mut alice_rx) = connections.register(alice, UserRole::Student, "alice".into());
        let (_, mut bob_rx) = connections.register(bob, UserRole::Student, "bob".into());

        let bridge = spawn_event_bridge(connections, events_rx, shutdown_tx.subscribe());

        let notification_id = Uuid::new_v4();
        events_tx
            .send(NotificationEvent::Read {
                recipient_id: alice,
                notification_id,
            })
            .unwrap();

        match alice_rx.recv().await.unwrap() {
            OutboundMessage::NotificationRead {
                notification_id: id,
            } => assert_eq!(id, notification_id),
            other => panic!("unexpected frame: {other:?}"),
        }
        assert!(bob_rx.try_recv().is_err());

        drop(events_tx);
        bridge.await.unwrap();
    }
}
