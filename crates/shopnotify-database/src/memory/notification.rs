//! In-memory notification store.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shopnotify_core::error::AppError;
use shopnotify_core::result::AppResult;
use shopnotify_core::types::id::{NotificationId, UserId};
use shopnotify_core::types::pagination::{PageRequest, PageResponse};
use shopnotify_entity::notification::{NewNotification, Notification};

use crate::filter::NotificationFilter;
use crate::traits::NotificationStore;

/// Vector-backed [`NotificationStore`].
///
/// Writes are visible to the next read as soon as `create` returns.
#[derive(Debug)]
pub struct MemoryNotificationStore {
    records: RwLock<Vec<Notification>>,
    next_id: AtomicI64,
    failing: AtomicBool,
}

impl Default for MemoryNotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent operation fail with a persistence error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Overwrite the creation time of a record. Returns `false` if absent.
    pub fn set_created_at(&self, id: NotificationId, at: DateTime<Utc>) -> bool {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        match records.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.created_at = at;
                true
            }
            None => false,
        }
    }

    /// Insert a fully formed record, e.g. one with unset tri-state flags.
    pub fn insert_raw(&self, mut record: Notification) -> Notification {
        record.id = NotificationId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        records.push(record.clone());
        record
    }

    /// Snapshot of every record, deleted ones included.
    pub fn all(&self) -> Vec<Notification> {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn check(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::persistence("notification store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn create(&self, new: &NewNotification) -> AppResult<Notification> {
        self.check()?;
        let now = Utc::now();
        let record = Notification {
            id: NotificationId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            user_id: new.user_id,
            title: new.title.clone(),
            message: new.message.clone(),
            url: new.tag.as_str().to_string(),
            created_at: now,
            acknowledged: Some(false),
            is_active: Some(true),
            is_deleted: false,
            group_context_id: new.group_context_id,
            modified_at: Some(now),
        };
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        records.push(record.clone());
        Ok(record)
    }

    async fn exists_matching(&self, filter: &NotificationFilter) -> AppResult<bool> {
        self.check()?;
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records.iter().any(|n| filter.matches(n)))
    }

    async fn list_page(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        self.check()?;
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        let mut visible: Vec<&Notification> = records
            .iter()
            .filter(|n| n.user_id == user_id && n.is_visible())
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = visible.len() as u64;
        let items = visible
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<bool> {
        self.check()?;
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        match records
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id && !n.is_deleted)
        {
            Some(n) => {
                n.acknowledged = Some(true);
                n.modified_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<bool> {
        self.check()?;
        let now = Utc::now();
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        for n in records
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_deleted && n.is_unread())
        {
            n.acknowledged = Some(true);
            n.modified_at = Some(now);
        }
        Ok(true)
    }

    async fn unread_count(&self, user_id: UserId) -> AppResult<i64> {
        self.check()?;
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        let count = records
            .iter()
            .filter(|n| n.user_id == user_id && n.is_visible() && n.is_unread())
            .count();
        Ok(count as i64)
    }

    async fn soft_delete(&self, id: NotificationId, user_id: UserId) -> AppResult<bool> {
        self.check()?;
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        match records
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id && !n.is_deleted)
        {
            Some(n) => {
                n.is_deleted = true;
                n.modified_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
