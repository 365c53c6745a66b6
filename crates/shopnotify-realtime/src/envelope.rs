//! Message envelope for outbound realtime events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping an event payload with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// Unique message ID for client-side deduplication
    pub id: String,
    /// Event name, e.g. `notification.created`
    pub event: String,
    /// Group the message was sent to
    pub group: String,
    /// The event payload
    pub payload: serde_json::Value,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
}

impl MessageEnvelope {
    /// Create a new envelope for a group broadcast
    pub fn new(group: &str, event: &str, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event: event.to_string(),
            group: group.to_string(),
            payload,
            timestamp: Utc::now(),
        }
    }
}
