//! Notification repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use shopnotify_core::error::{AppError, ErrorKind};
use shopnotify_core::result::AppResult;
use shopnotify_core::types::id::{NotificationId, UserId};
use shopnotify_core::types::pagination::{PageRequest, PageResponse};
use shopnotify_entity::notification::{NewNotification, Notification};

use crate::filter::NotificationFilter;
use crate::traits::NotificationStore;

/// Rows shown to the user: not deleted, active or unset.
const VISIBLE: &str = "is_deleted = FALSE AND (is_active IS NULL OR is_active = TRUE)";

/// Repository for notification records.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create(&self, new: &NewNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications \
             (user_id, title, message, url, created_at, acknowledged, is_active, is_deleted, group_context_id, modified_at) \
             VALUES ($1, $2, $3, $4, NOW(), FALSE, TRUE, FALSE, $5, NOW()) RETURNING *",
        )
        .bind(new.user_id)
        .bind(&new.title)
        .bind(&new.message)
        .bind(new.tag.as_str())
        .bind(new.group_context_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to create notification", e)
        })
    }

    async fn exists_matching(&self, filter: &NotificationFilter) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM notifications \
             WHERE user_id = $1 AND is_deleted = FALSE AND created_at > $2 \
             AND ($3::TEXT IS NULL OR url = $3) \
             AND ($4::TEXT IS NULL OR strpos(title, $4) > 0) \
             AND ($5::TEXT IS NULL OR strpos(COALESCE(message, ''), $5) > 0))",
        )
        .bind(filter.user_id)
        .bind(filter.created_after)
        .bind(filter.tag.map(|t| t.as_str()))
        .bind(filter.title_contains.as_deref())
        .bind(filter.message_contains.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to check notifications", e)
        })
    }

    async fn list_page(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND {VISIBLE}"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to count notifications", e)
        })?;

        let items = sqlx::query_as::<_, Notification>(&format!(
            "SELECT * FROM notifications WHERE user_id = $1 AND {VISIBLE} \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to list notifications", e)
        })?;

        Ok(PageResponse::new(items, page, total.max(0) as u64))
    }

    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET acknowledged = TRUE, modified_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Persistence, "Failed to mark read", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<bool> {
        sqlx::query(
            "UPDATE notifications SET acknowledged = TRUE, modified_at = NOW() \
             WHERE user_id = $1 AND is_deleted = FALSE \
             AND (acknowledged IS NULL OR acknowledged = FALSE)",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Persistence, "Failed to mark all read", e))?;
        Ok(true)
    }

    async fn unread_count(&self, user_id: UserId) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND {VISIBLE} \
             AND (acknowledged IS NULL OR acknowledged = FALSE)"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Persistence, "Failed to count unread", e))
    }

    async fn soft_delete(&self, id: NotificationId, user_id: UserId) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_deleted = TRUE, modified_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to delete notification", e)
        })?;
        Ok(result.rows_affected() > 0)
    }
}
