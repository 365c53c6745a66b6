//! Delivery channel traits.
//!
//! Both channels are best-effort: the notification record is already
//! durable by the time either is called, so a failure here is logged
//! and never escalated.

use async_trait::async_trait;

use crate::result::AppResult;

/// Outcome of a single push send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushResult {
    /// Whether the remote service accepted the message.
    pub success: bool,
    /// Remote message identifier, when the service returned one.
    pub message_id: Option<String>,
    /// Failure detail, when `success` is false.
    pub error: Option<String>,
}

impl PushResult {
    /// A successful send.
    pub fn delivered(message_id: Option<String>) -> Self {
        Self {
            success: true,
            message_id,
            error: None,
        }
    }

    /// A failed send.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Remote push transport (device token → title/body).
///
/// Transport failures are expected, so they are reported through
/// [`PushResult`] rather than an error.
#[async_trait]
pub trait PushChannel: Send + Sync + std::fmt::Debug + 'static {
    /// Send a push message to a single device.
    async fn send(&self, device_token: &str, title: &str, body: &str) -> PushResult;
}

/// Per-group real-time broadcast transport.
#[async_trait]
pub trait RealtimeChannel: Send + Sync + std::fmt::Debug + 'static {
    /// Broadcast an event to every subscriber of `group`.
    async fn broadcast(
        &self,
        group: &str,
        event: &str,
        payload: serde_json::Value,
    ) -> AppResult<()>;
}

/// Group name of a user's personal realtime channel.
pub fn user_group(user_id: impl std::fmt::Display) -> String {
    format!("user_{user_id}")
}
