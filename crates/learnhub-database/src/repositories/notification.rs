//! Notification repository implementation.
//!
//! Every read path filters `expires_at > NOW()` so that rows past their
//! expiry are invisible regardless of sweep timing. All mutations are
//! recipient-scoped conditional statements; ownership mismatches surface
//! as zero affected rows, indistinguishable from a missing id.

use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;
use learnhub_core::types::pagination::PageRequest;
use learnhub_entity::notification::Notification;

/// Repository for the notification record store.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a single notification.
    pub async fn create(&self, n: &Notification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, recipient_id, sender_id, title, message, data, action_url, is_read, read_at, created_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(n.id)
        .bind(n.recipient_id)
        .bind(n.sender_id)
        .bind(&n.title)
        .bind(&n.message)
        .bind(&n.data)
        .bind(&n.action_url)
        .bind(n.is_read)
        .bind(n.read_at)
        .bind(n.created_at)
        .bind(n.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    /// Insert a batch of notifications in a single statement.
    ///
    /// The batch either writes completely or the whole call fails; there are
    /// no per-row failure semantics.
    pub async fn create_many(&self, batch: &[Notification]) -> AppResult<Vec<Notification>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "INSERT INTO notifications (id, recipient_id, sender_id, title, message, data, action_url, is_read, read_at, created_at, expires_at) ",
        );
        qb.push_values(batch, |mut row, n| {
            row.push_bind(n.id)
                .push_bind(n.recipient_id)
                .push_bind(n.sender_id)
                .push_bind(&n.title)
                .push_bind(&n.message)
                .push_bind(&n.data)
                .push_bind(&n.action_url)
                .push_bind(n.is_read)
                .push_bind(n.read_at)
                .push_bind(n.created_at)
                .push_bind(n.expires_at);
        });
        qb.push(" RETURNING *");

        qb.build_query_as::<Notification>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create notifications", e)
            })
    }

    /// List one page of a user's notifications, newest first, with the
    /// total matching count.
    pub async fn find_page(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
        unread_only: bool,
    ) -> AppResult<(Vec<Notification>, u64)> {
        let unread_filter = if unread_only {
            " AND is_read = FALSE"
        } else {
            ""
        };

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM notifications \
             WHERE recipient_id = $1 AND expires_at > NOW(){unread_filter}"
        ))
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
        })?;

        let notifications = sqlx::query_as::<_, Notification>(&format!(
            "SELECT * FROM notifications \
             WHERE recipient_id = $1 AND expires_at > NOW(){unread_filter} \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(recipient_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
        })?;

        Ok((notifications, total as u64))
    }

    /// Count unread, unexpired notifications for a user.
    pub async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE recipient_id = $1 AND is_read = FALSE AND expires_at > NOW()",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))?;
        Ok(count as u64)
    }

    /// Mark one notification as read, scoped by id and recipient.
    ///
    /// Idempotent: `read_at` is set only on the first transition. Returns
    /// `None` when the row does not exist, is owned by someone else, or has
    /// expired.
    pub async fn mark_read(
        &self,
        notification_id: Uuid,
        recipient_id: Uuid,
    ) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications \
             SET is_read = TRUE, read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1 AND recipient_id = $2 AND expires_at > NOW() \
             RETURNING *",
        )
        .bind(notification_id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))
    }

    /// Mark all of a user's unread notifications as read.
    ///
    /// A conditional bulk update over `is_read = FALSE`, so a concurrent
    /// create never observes a stale snapshot.
    pub async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = TRUE, read_at = NOW() \
             WHERE recipient_id = $1 AND is_read = FALSE AND expires_at > NOW()",
        )
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    /// Hard-delete one notification, scoped by id and recipient.
    pub async fn delete(
        &self,
        notification_id: Uuid,
        recipient_id: Uuid,
    ) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "DELETE FROM notifications \
             WHERE id = $1 AND recipient_id = $2 AND expires_at > NOW() \
             RETURNING *",
        )
        .bind(notification_id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete notification", e))
    }

    /// Delete a single user's expired rows (lazy per-user sweep).
    pub async fn delete_expired_for_user(&self, recipient_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE recipient_id = $1 AND expires_at <= NOW()",
        )
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to sweep expired rows", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Delete all expired rows (global sweep).
    pub async fn delete_expired(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to sweep expired rows", e)
            })?;
        Ok(result.rows_affected())
    }
}
