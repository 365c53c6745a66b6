//! Real-time channel configuration.

use serde::{Deserialize, Serialize};

/// Real-time (per-user group) channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Buffer size of each subscriber's outbound queue.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Event name used when a new notification is broadcast.
    #[serde(default = "default_event_name")]
    pub notification_event: String,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            notification_event: default_event_name(),
        }
    }
}

fn default_channel_buffer() -> usize {
    64
}

fn default_event_name() -> String {
    "notification.created".to_string()
}
