//! In-memory device registry.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use shopnotify_core::result::AppResult;
use shopnotify_core::types::id::UserId;

use crate::traits::DeviceTokenLookup;

/// One current token per user; registering again replaces it.
#[derive(Debug, Default)]
pub struct MemoryDeviceRegistry {
    tokens: RwLock<HashMap<UserId, String>>,
}

impl MemoryDeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the token for a user.
    pub fn register(&self, user_id: UserId, token: impl Into<String>) {
        self.tokens
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(user_id, token.into());
    }
}

#[async_trait]
impl DeviceTokenLookup for MemoryDeviceRegistry {
    async fn device_token(&self, user_id: UserId) -> AppResult<Option<String>> {
        Ok(self
            .tokens
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&user_id)
            .cloned())
    }
}
