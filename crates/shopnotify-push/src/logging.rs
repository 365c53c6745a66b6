//! Push channel used when remote delivery is disabled.

use async_trait::async_trait;
use tracing::info;

use shopnotify_core::traits::{PushChannel, PushResult};

/// Logs every push and reports it as delivered.
#[derive(Debug, Default, Clone)]
pub struct LoggingPushChannel;

impl LoggingPushChannel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PushChannel for LoggingPushChannel {
    async fn send(&self, device_token: &str, title: &str, body: &str) -> PushResult {
        let suffix = device_token
            .char_indices()
            .rev()
            .nth(5)
            .map_or(device_token, |(i, _)| &device_token[i..]);
        info!(token_suffix = suffix, title, body, "Push (disabled)");
        PushResult::delivered(None)
    }
}
