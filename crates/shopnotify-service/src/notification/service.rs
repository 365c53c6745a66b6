//! Notification queries and read-state changes.

use std::sync::Arc;

use tracing::info;

use shopnotify_core::error::AppError;
use shopnotify_core::types::id::{NotificationId, UserId};
use shopnotify_core::types::pagination::{PageRequest, PageResponse};
use shopnotify_database::traits::NotificationStore;
use shopnotify_entity::notification::Notification;

/// Read side of a user's notification inbox.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification store.
    store: Arc<dyn NotificationStore>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Lists a user's notifications, newest first.
    pub async fn list_notifications(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> Result<PageResponse<Notification>, AppError> {
        self.store.list_page(user_id, page).await
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, user_id: UserId) -> Result<i64, AppError> {
        self.store.unread_count(user_id).await
    }

    /// Marks one notification as read. `false` if it is missing or not the user's.
    pub async fn mark_read(
        &self,
        user_id: UserId,
        notification_id: NotificationId,
    ) -> Result<bool, AppError> {
        self.store.mark_read(notification_id, user_id).await
    }

    /// Marks every notification of the user as read.
    pub async fn mark_all_read(&self, user_id: UserId) -> Result<bool, AppError> {
        let done = self.store.mark_all_read(user_id).await?;
        info!(user_id = %user_id, "Marked all notifications read");
        Ok(done)
    }

    /// Soft-deletes a notification. `false` if it is missing or not the user's.
    pub async fn delete(
        &self,
        user_id: UserId,
        notification_id: NotificationId,
    ) -> Result<bool, AppError> {
        self.store.soft_delete(notification_id, user_id).await
    }
}
