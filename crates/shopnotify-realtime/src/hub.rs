//! Group registry and broadcast.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use shopnotify_core::config::RealtimeConfig;
use shopnotify_core::result::AppResult;
use shopnotify_core::traits::RealtimeChannel;

use crate::envelope::MessageEnvelope;

#[derive(Debug)]
struct Subscriber {
    id: u64,
    tx: mpsc::Sender<String>,
}

/// In-process hub of realtime groups.
///
/// Broadcasts never block: a subscriber whose buffer is full misses that
/// message, and subscribers whose receiver was dropped are pruned.
#[derive(Debug)]
pub struct RealtimeHub {
    /// Group name → subscribers.
    groups: DashMap<String, Vec<Subscriber>>,
    buffer_size: usize,
    next_id: AtomicU64,
}

impl RealtimeHub {
    /// Creates a hub whose subscriber channels hold `buffer_size` messages.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            groups: DashMap::new(),
            buffer_size: buffer_size.max(1),
            next_id: AtomicU64::new(1),
        }
    }

    /// Creates a hub from configuration.
    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self::new(config.channel_buffer_size)
    }

    /// Joins a group, returning the receiving end of a new subscription.
    pub fn join(&self, group: &str) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.groups
            .entry(group.to_string())
            .or_default()
            .push(Subscriber { id, tx });
        debug!(group, subscriber = id, "Joined realtime group");
        rx
    }

    /// Returns the number of live subscribers in a group.
    pub fn subscriber_count(&self, group: &str) -> usize {
        self.groups
            .get(group)
            .map(|subs| subs.iter().filter(|s| !s.tx.is_closed()).count())
            .unwrap_or(0)
    }

    /// Returns the number of groups with at least one subscriber.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Sends a serialized message to every subscriber of a group.
    /// Returns the number of subscribers that accepted it.
    fn fan_out(&self, group: &str, text: &str) -> usize {
        let Some(mut subscribers) = self.groups.get_mut(group) else {
            return 0;
        };

        let mut delivered = 0;
        subscribers.retain(|sub| match sub.tx.try_send(text.to_string()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                warn!(group, subscriber = sub.id, "Subscriber buffer full, message dropped");
                true
            }
            Err(TrySendError::Closed(_)) => {
                debug!(group, subscriber = sub.id, "Pruned closed subscriber");
                false
            }
        });

        if subscribers.is_empty() {
            drop(subscribers);
            self.groups.remove_if(group, |_, subs| subs.is_empty());
        }
        delivered
    }
}

#[async_trait]
impl RealtimeChannel for RealtimeHub {
    async fn broadcast(
        &self,
        group: &str,
        event: &str,
        payload: serde_json::Value,
    ) -> AppResult<()> {
        let envelope = MessageEnvelope::new(group, event, payload);
        let text = serde_json::to_string(&envelope)?;
        let delivered = self.fan_out(group, &text);
        debug!(group, event, delivered, "Realtime broadcast");
        Ok(())
    }
}
