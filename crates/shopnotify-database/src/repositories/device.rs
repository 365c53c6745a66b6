//! Device registration lookups.

use async_trait::async_trait;
use sqlx::PgPool;

use shopnotify_core::error::{AppError, ErrorKind};
use shopnotify_core::result::AppResult;
use shopnotify_core::types::id::UserId;

use crate::traits::DeviceTokenLookup;

/// Reads the most recently refreshed push token per user.
#[derive(Debug, Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    /// Create a new device repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceTokenLookup for DeviceRepository {
    async fn device_token(&self, user_id: UserId) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT token FROM device_registrations WHERE user_id = $1 \
             ORDER BY updated_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Persistence, "Failed to look up device token", e))
    }
}
