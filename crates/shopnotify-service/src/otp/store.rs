//! Mutex-guarded map with per-entry expiry.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
struct Entry<V> {
    value: V,
    created_at: Instant,
    expires_at: Instant,
}

/// Key-value store whose entries expire after a per-entry TTL.
///
/// Expired entries are swept on every access. The lock is only held for
/// map access, never across an await point.
#[derive(Debug)]
pub struct TtlStore<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> Default for TtlStore<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> TtlStore<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value that expires after `ttl`.
    pub fn put(&self, key: K, value: V, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Self::sweep(&mut entries, now);
        entries.insert(
            key,
            Entry {
                value,
                created_at: now,
                expires_at: now + ttl,
            },
        );
    }

    /// The live value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Self::sweep(&mut entries, Instant::now());
        entries.get(key).map(|e| e.value.clone())
    }

    /// Age of the live entry for `key`.
    pub fn age(&self, key: &K) -> Option<Duration> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Self::sweep(&mut entries, now);
        entries.get(key).map(|e| now.duration_since(e.created_at))
    }

    /// Remove and return the live value for `key`.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Self::sweep(&mut entries, Instant::now());
        entries.remove(key).map(|e| e.value)
    }

    /// Remove the entry for `key` only if `pred` accepts its live value.
    pub fn remove_if(&self, key: &K, pred: impl FnOnce(&V) -> bool) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Self::sweep(&mut entries, Instant::now());
        if entries.get(key).is_some_and(|e| pred(&e.value)) {
            entries.remove(key).map(|e| e.value)
        } else {
            None
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Self::sweep(&mut entries, Instant::now());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep(entries: &mut HashMap<K, Entry<V>>, now: Instant) {
        entries.retain(|_, e| e.expires_at > now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let store = TtlStore::new();
        store.put("a", 1, Duration::from_secs(10));
        store.put("b", 2, Duration::from_secs(30));

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(store.get(&"a"), Some(1));
        assert_eq!(store.age(&"a"), Some(Duration::from_secs(9)));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.get(&"a"), None);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_replaces_and_resets_ttl() {
        let store = TtlStore::new();
        store.put("k", "old", Duration::from_secs(5));
        tokio::time::advance(Duration::from_secs(4)).await;
        store.put("k", "new", Duration::from_secs(5));
        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(store.get(&"k"), Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_if_respects_predicate() {
        let store = TtlStore::new();
        store.put(1, 42, Duration::from_secs(60));
        assert_eq!(store.remove_if(&1, |v| *v == 7), None);
        assert_eq!(store.remove_if(&1, |v| *v == 42), Some(42));
        assert!(store.is_empty());
        assert_eq!(store.remove(&1), None);
    }
}
