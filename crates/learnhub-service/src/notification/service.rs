//! Notification creation, queries, and read-state transitions.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use learnhub_core::config::NotificationsConfig;
use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_core::types::pagination::{PageRequest, PageResponse};
use learnhub_entity::notification::{
    BulkNotification, MAX_MESSAGE_LEN, MAX_TITLE_LEN, NewNotification, Notification,
};

use super::events::{EventReceiver, EventSender, NotificationEvent};
use super::store::NotificationStore;

/// One page of a user's notifications plus a fresh unread count.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationPage {
    /// Notifications on this page, newest first.
    pub notifications: Vec<Notification>,
    /// Current page number (1-based).
    pub page: u64,
    /// Items per page.
    pub page_size: u64,
    /// Total matching notifications.
    pub total_items: u64,
    /// Total pages.
    pub total_pages: u64,
    /// Unread count, computed fresh on every call.
    pub unread_count: u64,
}

/// Business-logic facade over the notification record store.
///
/// The sole writer and reader of the store. Every successful create emits
/// a [`NotificationEvent`] on the broadcast channel; event emission never
/// affects the outcome of the enclosing call.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    config: NotificationsConfig,
    events: EventSender,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish()
    }
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        config: NotificationsConfig,
        event_buffer: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(event_buffer);
        Self {
            store,
            config,
            events,
        }
    }

    /// Subscribes to the domain-event channel.
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Creates one notification.
    ///
    /// Persistence is the durability boundary: once the store accepts the
    /// row the call succeeds, whether or not any push subscriber is alive.
    pub async fn create(&self, input: NewNotification) -> AppResult<Notification> {
        validate_text(&input.title, &input.message)?;

        let row = self.build_row(
            input.recipient_id,
            input.sender_id,
            input.title,
            input.message,
            input.data,
            input.action_url,
            input.expires_at,
        );

        let notification = self.store.insert(row).await?;

        debug!(
            notification_id = %notification.id,
            recipient_id = %notification.recipient_id,
            "Notification created"
        );

        self.emit(NotificationEvent::Created(notification.clone()));
        Ok(notification)
    }

    /// Creates one independent notification per recipient in a single
    /// batch write, then emits one push event per recipient.
    pub async fn create_bulk(&self, input: BulkNotification) -> AppResult<Vec<Notification>> {
        if input.recipient_ids.is_empty() {
            return Err(AppError::validation("recipient_ids must not be empty"));
        }
        validate_text(&input.title, &input.message)?;

        let batch: Vec<Notification> = input
            .recipient_ids
            .iter()
            .map(|recipient_id| {
                self.build_row(
                    *recipient_id,
                    input.sender_id,
                    input.title.clone(),
                    input.message.clone(),
                    input.data.clone(),
                    input.action_url.clone(),
                    input.expires_at,
                )
            })
            .collect();

        let created = self.store.insert_many(batch).await?;

        info!(count = created.len(), "Bulk notifications created");

        // Each recipient's push is independent and best-effort.
        for notification in &created {
            self.emit(NotificationEvent::Created(notification.clone()));
        }
        Ok(created)
    }

    /// Lists a user's notifications, newest first, with pagination metadata
    /// and a fresh unread count.
    ///
    /// Sweeps the user's expired rows first (lazy cleanup); the page query
    /// itself also filters on expiry, so the listing is correct regardless
    /// of sweep timing.
    pub async fn list(
        &self,
        user_id: Uuid,
        page: PageRequest,
        unread_only: bool,
    ) -> AppResult<NotificationPage> {
        let swept = self.store.delete_expired_for_user(user_id).await?;
        if swept > 0 {
            debug!(user_id = %user_id, swept, "Swept expired notifications");
        }

        let (notifications, total) = self.store.find_page(user_id, &page, unread_only).await?;
        let unread_count = self.store.count_unread(user_id).await?;

        let meta = PageResponse::new(notifications, page.page, page.page_size, total);
        Ok(NotificationPage {
            notifications: meta.items,
            page: meta.page,
            page_size: meta.page_size,
            total_items: meta.total_items,
            total_pages: meta.total_pages,
            unread_count,
        })
    }

    /// Unread count for polling clients. Expiry-filtered, no sweep.
    pub async fn unread_count(&self, user_id: Uuid) -> AppResult<u64> {
        self.store.count_unread(user_id).await
    }

    /// Marks one notification as read, scoped to the acting user.
    ///
    /// Idempotent; a foreign or missing id yields `None` rather than an
    /// authorization error, so existence never leaks across users.
    pub async fn mark_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Notification>> {
        let updated = self.store.mark_read(notification_id, user_id).await?;

        if updated.is_some() {
            // Mirror the transition to the user's other live connections.
            self.emit(NotificationEvent::Read {
                recipient_id: user_id,
                notification_id,
            });
        }
        Ok(updated)
    }

    /// Marks all of a user's unread notifications as read. Idempotent:
    /// a second call reports zero modified rows.
    pub async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let modified = self.store.mark_all_read(user_id).await?;

        if modified > 0 {
            self.emit(NotificationEvent::AllRead {
                recipient_id: user_id,
            });
        }
        Ok(modified)
    }

    /// Hard-deletes one notification, scoped to the acting user.
    pub async fn delete(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Notification>> {
        self.store.delete(notification_id, user_id).await
    }

    /// Global expiry sweep. Redundant with the lazy per-user sweep in
    /// [`Self::list`]; run periodically to bound the expired backlog of
    /// inactive users.
    pub async fn clean_expired(&self) -> AppResult<u64> {
        let deleted = self.store.delete_expired().await?;
        if deleted > 0 {
            info!(deleted, "Expired notifications deleted");
        }
        Ok(deleted)
    }

    fn build_row(
        &self,
        recipient_id: Uuid,
        sender_id: Option<Uuid>,
        title: String,
        message: String,
        data: Option<serde_json::Value>,
        action_url: Option<String>,
        expires_at: Option<chrono::DateTime<Utc>>,
    ) -> Notification {
        let now = Utc::now();
        Notification {
            id: Uuid::new_v4(),
            recipient_id,
            sender_id,
            title,
            message,
            data,
            action_url,
            is_read: false,
            read_at: None,
            created_at: now,
            expires_at: expires_at
                .unwrap_or_else(|| now + Duration::days(self.config.default_expiry_days)),
        }
    }

    /// Fire-and-forget event emission. A send error only means no
    /// subscriber is alive, which is not a failure of the store operation.
    fn emit(&self, event: NotificationEvent) {
        if self.events.send(event).is_err() {
            debug!("No realtime subscriber for notification event");
        }
    }
}

fn validate_text(title: &str, message: &str) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(AppError::validation("title must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::validation(format!(
            "title exceeds {MAX_TITLE_LEN} characters"
        )));
    }
    if message.trim().is_empty() {
        return Err(AppError::validation("message must not be empty"));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::validation(format!(
            "message exceeds {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use learnhub_core::error::ErrorKind;
    use std::sync::Mutex;

    /// In-memory store mirroring the SQL semantics of the repository,
    /// including expiry filtering on every read and mutation path.
    #[derive(Debug, Default)]
    struct MemoryStore {
        rows: Mutex<Vec<Notification>>,
    }

    impl MemoryStore {
        fn row_count(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl NotificationStore for MemoryStore {
        async fn insert(&self, n: Notification) -> AppResult<Notification> {
            self.rows.lock().unwrap().push(n.clone());
            Ok(n)
        }

        async fn insert_many(&self, batch: Vec<Notification>) -> AppResult<Vec<Notification>> {
            self.rows.lock().unwrap().extend(batch.iter().cloned());
            Ok(batch)
        }

        async fn find_page(
            &self,
            recipient_id: Uuid,
            page: &PageRequest,
            unread_only: bool,
        ) -> AppResult<(Vec<Notification>, u64)> {
            let now = Utc::now();
            let mut matching: Vec<Notification> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|n| {
                    n.recipient_id == recipient_id
                        && !n.is_expired(now)
                        && (!unread_only || !n.is_read)
                })
                .cloned()
                .collect();
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

            let total = matching.len() as u64;
            let items = matching
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit() as usize)
                .collect();
            Ok((items, total))
        }

        async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64> {
            let now = Utc::now();
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|n| n.recipient_id == recipient_id && !n.is_read && !n.is_expired(now))
                .count() as u64)
        }

        async fn mark_read(
            &self,
            notification_id: Uuid,
            recipient_id: Uuid,
        ) -> AppResult<Option<Notification>> {
            let now = Utc::now();
            let mut rows = self.rows.lock().unwrap();
            for n in rows.iter_mut() {
                if n.id == notification_id && n.recipient_id == recipient_id && !n.is_expired(now)
                {
                    n.is_read = true;
                    n.read_at.get_or_insert(now);
                    return Ok(Some(n.clone()));
                }
            }
            Ok(None)
        }

        async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64> {
            let now = Utc::now();
            let mut modified = 0;
            for n in self.rows.lock().unwrap().iter_mut() {
                if n.recipient_id == recipient_id && !n.is_read && !n.is_expired(now) {
                    n.is_read = true;
                    n.read_at = Some(now);
                    modified += 1;
                }
            }
            Ok(modified)
        }

        async fn delete(
            &self,
            notification_id: Uuid,
            recipient_id: Uuid,
        ) -> AppResult<Option<Notification>> {
            let now = Utc::now();
            let mut rows = self.rows.lock().unwrap();
            if let Some(pos) = rows.iter().position(|n| {
                n.id == notification_id && n.recipient_id == recipient_id && !n.is_expired(now)
            }) {
                return Ok(Some(rows.remove(pos)));
            }
            Ok(None)
        }

        async fn delete_expired_for_user(&self, recipient_id: Uuid) -> AppResult<u64> {
            let now = Utc::now();
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|n| n.recipient_id != recipient_id || !n.is_expired(now));
            Ok((before - rows.len()) as u64)
        }

        async fn delete_expired(&self) -> AppResult<u64> {
            let now = Utc::now();
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|n| !n.is_expired(now));
            Ok((before - rows.len()) as u64)
        }
    }

    fn service_with_store() -> (NotificationService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let service = NotificationService::new(
            store.clone(),
            NotificationsConfig::default(),
            16,
        );
        (service, store)
    }

    fn new_input(recipient: Uuid) -> NewNotification {
        NewNotification::new(recipient, "Test", "Hello")
    }

    #[tokio::test]
    async fn test_create_assigns_defaults() {
        let (service, _) = service_with_store();
        let recipient = Uuid::new_v4();

        let n = service.create(new_input(recipient)).await.unwrap();

        assert_eq!(n.recipient_id, recipient);
        assert!(!n.is_read);
        assert!(n.read_at.is_none());
        assert!(n.sender_id.is_none());
        // default expiry is 30 days out
        let days = (n.expires_at - n.created_at).num_days();
        assert_eq!(days, 30);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_text() {
        let (service, _) = service_with_store();
        let recipient = Uuid::new_v4();

        let mut input = new_input(recipient);
        input.title = "   ".into();
        let err = service.create(input).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let mut input = new_input(recipient);
        input.title = "x".repeat(201);
        assert!(service.create(input).await.is_err());

        let mut input = new_input(recipient);
        input.message = "x".repeat(1001);
        assert!(service.create(input).await.is_err());
    }

    #[tokio::test]
    async fn test_mark_read_idempotent() {
        let (service, _) = service_with_store();
        let recipient = Uuid::new_v4();
        let n = service.create(new_input(recipient)).await.unwrap();

        let first = service.mark_read(n.id, recipient).await.unwrap().unwrap();
        assert!(first.is_read);
        let first_read_at = first.read_at.unwrap();

        let second = service.mark_read(n.id, recipient).await.unwrap().unwrap();
        assert!(second.is_read);
        assert_eq!(second.read_at.unwrap(), first_read_at);
    }

    #[tokio::test]
    async fn test_recipient_isolation() {
        let (service, _) = service_with_store();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let bobs = service.create(new_input(bob)).await.unwrap();

        // Alice acting on Bob's id is indistinguishable from not-found.
        assert!(service.mark_read(bobs.id, alice).await.unwrap().is_none());
        assert!(service.delete(bobs.id, alice).await.unwrap().is_none());

        // Bob's record is untouched and invisible to Alice.
        assert_eq!(service.unread_count(alice).await.unwrap(), 0);
        assert_eq!(service.unread_count(bob).await.unwrap(), 1);
        let page = service
            .list(alice, PageRequest::default(), false)
            .await
            .unwrap();
        assert!(page.notifications.is_empty());
    }

    #[tokio::test]
    async fn test_expired_rows_excluded_before_sweep() {
        let (service, store) = service_with_store();
        let recipient = Uuid::new_v4();

        // Physically present but past expiry.
        let mut input = new_input(recipient);
        input.expires_at = Some(Utc::now() - Duration::hours(1));
        service.create(input).await.unwrap();
        assert_eq!(store.row_count(), 1);

        assert_eq!(service.unread_count(recipient).await.unwrap(), 0);

        let page = service
            .list(recipient, PageRequest::default(), false)
            .await
            .unwrap();
        assert!(page.notifications.is_empty());
        assert_eq!(page.unread_count, 0);

        // The list call lazily swept the expired row.
        assert_eq!(store.row_count(), 0);
    }

    #[tokio::test]
    async fn test_expired_rows_not_mutable() {
        let (service, _) = service_with_store();
        let recipient = Uuid::new_v4();

        let mut input = new_input(recipient);
        input.expires_at = Some(Utc::now() - Duration::seconds(5));
        let n = service.create(input).await.unwrap();

        assert!(service.mark_read(n.id, recipient).await.unwrap().is_none());
        assert!(service.delete(n.id, recipient).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bulk_fan_out_independent_records() {
        let (service, _) = service_with_store();
        let recipients: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

        let created = service
            .create_bulk(BulkNotification {
                recipient_ids: recipients.clone(),
                sender_id: Some(Uuid::new_v4()),
                title: "Course published".into(),
                message: "A new course is live".into(),
                data: None,
                action_url: None,
                expires_at: None,
            })
            .await
            .unwrap();

        assert_eq!(created.len(), 3);
        let ids: std::collections::HashSet<Uuid> = created.iter().map(|n| n.id).collect();
        assert_eq!(ids.len(), 3);

        // Reading one recipient's copy leaves the others unread.
        service
            .mark_read(created[0].id, recipients[0])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(service.unread_count(recipients[0]).await.unwrap(), 0);
        assert_eq!(service.unread_count(recipients[1]).await.unwrap(), 1);
        assert_eq!(service.unread_count(recipients[2]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bulk_rejects_empty_recipients() {
        let (service, _) = service_with_store();
        let err = service
            .create_bulk(BulkNotification {
                recipient_ids: vec![],
                sender_id: None,
                title: "t".into(),
                message: "m".into(),
                data: None,
                action_url: None,
                expires_at: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_listing_sorted_newest_first() {
        let (service, store) = service_with_store();
        let recipient = Uuid::new_v4();

        // Insert directly with spread-out timestamps to avoid same-instant ties.
        let base = Utc::now();
        for i in 0..5 {
            let mut n = service.build_row(
                recipient,
                None,
                format!("n{i}"),
                "m".into(),
                None,
                None,
                None,
            );
            n.created_at = base - Duration::minutes(i);
            store.insert(n).await.unwrap();
        }

        let page = service
            .list(recipient, PageRequest::new(1, 10), false)
            .await
            .unwrap();
        let times: Vec<_> = page.notifications.iter().map(|n| n.created_at).collect();
        let mut sorted = times.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(times, sorted);
        assert_eq!(page.notifications[0].title, "n0");
    }

    #[tokio::test]
    async fn test_pagination_bounds() {
        let (service, _) = service_with_store();
        let recipient = Uuid::new_v4();
        for _ in 0..7 {
            service.create(new_input(recipient)).await.unwrap();
        }

        let page = service
            .list(recipient, PageRequest::new(2, 3), false)
            .await
            .unwrap();
        assert_eq!(page.notifications.len(), 3);
        assert_eq!(page.total_items, 7);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.unread_count, 7);

        let unread_page = service
            .list(recipient, PageRequest::new(1, 10), true)
            .await
            .unwrap();
        assert_eq!(unread_page.notifications.len(), 7);
    }

    #[tokio::test]
    async fn test_mark_all_read_idempotent() {
        let (service, _) = service_with_store();
        let recipient = Uuid::new_v4();
        for _ in 0..4 {
            service.create(new_input(recipient)).await.unwrap();
        }

        assert_eq!(service.mark_all_read(recipient).await.unwrap(), 4);
        assert_eq!(service.mark_all_read(recipient).await.unwrap(), 0);
        assert_eq!(service.unread_count(recipient).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_succeeds_without_subscriber() {
        // No realtime subscriber exists; persistence must not care.
        let (service, _) = service_with_store();
        let recipient = Uuid::new_v4();

        let n = service.create(new_input(recipient)).await.unwrap();

        let page = service
            .list(recipient, PageRequest::default(), false)
            .await
            .unwrap();
        assert_eq!(page.notifications.len(), 1);
        assert_eq!(page.notifications[0].id, n.id);
    }

    #[tokio::test]
    async fn test_events_emitted_to_subscriber() {
        let (service, _) = service_with_store();
        let recipient = Uuid::new_v4();
        let mut rx = service.subscribe();

        let n = service.create(new_input(recipient)).await.unwrap();
        match rx.recv().await.unwrap() {
            NotificationEvent::Created(created) => assert_eq!(created.id, n.id),
            other => panic!("unexpected event: {other:?}"),
        }

        service.mark_read(n.id, recipient).await.unwrap();
        match rx.recv().await.unwrap() {
            NotificationEvent::Read {
                recipient_id,
                notification_id,
            } => {
                assert_eq!(recipient_id, recipient);
                assert_eq!(notification_id, n.id);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_clean_expired_global_sweep() {
        let (service, store) = service_with_store();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let mut expired = new_input(a);
        expired.expires_at = Some(Utc::now() - Duration::days(1));
        service.create(expired).await.unwrap();
        service.create(new_input(b)).await.unwrap();

        assert_eq!(service.clean_expired().await.unwrap(), 1);
        assert_eq!(store.row_count(), 1);
        assert_eq!(service.clean_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_example_scenario() {
        // create → count 1 → mark read → count 0 → repeat mark read, same read_at
        let (service, _) = service_with_store();
        let u1 = Uuid::new_v4();

        let n = service
            .create(NewNotification::new(u1, "Test", "Hello"))
            .await
            .unwrap();

        assert_eq!(service.unread_count(u1).await.unwrap(), 1);

        let marked = service.mark_read(n.id, u1).await.unwrap().unwrap();
        assert!(marked.is_read);
        let read_at = marked.read_at.unwrap();

        assert_eq!(service.unread_count(u1).await.unwrap(), 0);

        let again = service.mark_read(n.id, u1).await.unwrap().unwrap();
        assert_eq!(again.read_at.unwrap(), read_at);
    }
}
