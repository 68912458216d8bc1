//! Storage seam for the notification service.
//!
//! The service talks to the record store through this trait so that tests
//! can run against an in-memory implementation while production uses the
//! sqlx-backed [`NotificationRepository`].

use async_trait::async_trait;
use uuid::Uuid;

use learnhub_core::result::AppResult;
use learnhub_core::types::pagination::PageRequest;
use learnhub_database::NotificationRepository;
use learnhub_entity::notification::Notification;

/// Durable, queryable notification record store.
///
/// Implementations must exclude rows whose `expires_at` has passed from
/// every read path and from recipient-scoped mutations, regardless of
/// whether a sweep has physically deleted them.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist one notification.
    async fn insert(&self, n: Notification) -> AppResult<Notification>;

    /// Persist a batch atomically (the batch writes or the call fails).
    async fn insert_many(&self, batch: Vec<Notification>) -> AppResult<Vec<Notification>>;

    /// One page of a recipient's notifications, `created_at` descending,
    /// plus the total matching count.
    async fn find_page(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
        unread_only: bool,
    ) -> AppResult<(Vec<Notification>, u64)>;

    /// Unread, unexpired count for a recipient.
    async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64>;

    /// Idempotent recipient-scoped read transition; `None` for missing,
    /// foreign, or expired ids.
    async fn mark_read(
        &self,
        notification_id: Uuid,
        recipient_id: Uuid,
    ) -> AppResult<Option<Notification>>;

    /// Bulk read transition over a recipient's unread rows; returns the
    /// number of rows modified.
    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64>;

    /// Recipient-scoped hard delete with the same soft not-found semantics
    /// as `mark_read`.
    async fn delete(
        &self,
        notification_id: Uuid,
        recipient_id: Uuid,
    ) -> AppResult<Option<Notification>>;

    /// Delete one recipient's expired rows.
    async fn delete_expired_for_user(&self, recipient_id: Uuid) -> AppResult<u64>;

    /// Delete all expired rows.
    async fn delete_expired(&self) -> AppResult<u64>;
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn insert(&self, n: Notification) -> AppResult<Notification> {
        self.create(&n).await
    }

    async fn insert_many(&self, batch: Vec<Notification>) -> AppResult<Vec<Notification>> {
        self.create_many(&batch).await
    }

    async fn find_page(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
        unread_only: bool,
    ) -> AppResult<(Vec<Notification>, u64)> {
        NotificationRepository::find_page(self, recipient_id, page, unread_only).await
    }

    async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64> {
        NotificationRepository::count_unread(self, recipient_id).await
    }

    async fn mark_read(
        &self,
        notification_id: Uuid,
        recipient_id: Uuid,
    ) -> AppResult<Option<Notification>> {
        NotificationRepository::mark_read(self, notification_id, recipient_id).await
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64> {
        NotificationRepository::mark_all_read(self, recipient_id).await
    }

    async fn delete(
        &self,
        notification_id: Uuid,
        recipient_id: Uuid,
    ) -> AppResult<Option<Notification>> {
        NotificationRepository::delete(self, notification_id, recipient_id).await
    }

    async fn delete_expired_for_user(&self, recipient_id: Uuid) -> AppResult<u64> {
        NotificationRepository::delete_expired_for_user(self, recipient_id).await
    }

    async fn delete_expired(&self) -> AppResult<u64> {
        NotificationRepository::delete_expired(self).await
    }
}
