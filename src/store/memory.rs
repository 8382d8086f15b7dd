//! In-process TTL store.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::store::{BreakerStore, StoreError};

#[derive(Debug, Clone, Copy)]
struct Entry {
    value: i64,
    expires_at: Instant,
}

/// Writes between automatic sweeps of expired entries.
pub const DEFAULT_SWEEP_EVERY: usize = 1024;

/// A thread-safe in-memory store with lazy expiry.
///
/// Expired entries are dropped when read, and every `sweep_every` writes the
/// whole map is swept, so keys that are never read again are still reclaimed.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, Entry>>,
    writes: Arc<AtomicUsize>,
    sweep_every: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_sweep_every(DEFAULT_SWEEP_EVERY)
    }
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that sweeps expired entries every `writes` writes.
    pub fn with_sweep_every(writes: usize) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            writes: Arc::new(AtomicUsize::new(0)),
            sweep_every: writes.max(1),
        }
    }

    /// Number of entries, including ones that expired but were not swept yet.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.inner.len();
        self.inner.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.inner.len())
    }

    fn read(&self, key: &str) -> Option<i64> {
        let now = Instant::now();
        let entry = *self.inner.get(key)?;
        if entry.expires_at > now {
            return Some(entry.value);
        }
        self.inner.remove_if(key, |_, e| e.expires_at <= now);
        None
    }
}

#[async_trait]
impl BreakerStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
        Ok(self.read(key))
    }

    async fn set(&self, key: &str, value: i64, ttl: Duration) -> Result<(), StoreError> {
        let expires_at = Instant::now() + ttl;
        self.inner.insert(key.to_string(), Entry { value, expires_at });

        let written = self.writes.fetch_add(1, Ordering::Relaxed) + 1;
        if written % self.sweep_every == 0 {
            let purged = self.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, remaining = self.inner.len(), "Swept expired breaker counters");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_set() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", 7, Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(7));

        store.set("k", 0, Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_expiry() {
        let store = MemoryStore::new();
        store.set("k", 3, Duration::from_millis(20)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty(), "expired entry should be dropped on read");
    }

    #[tokio::test]
    async fn test_set_refreshes_ttl() {
        let store = MemoryStore::new();
        store.set("k", 1, Duration::from_millis(300)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        store.set("k", 2, Duration::from_millis(300)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(store.get("k").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = MemoryStore::new();
        store.set("a", 1, Duration::from_millis(10)).await.unwrap();
        store.set("b", 1, Duration::from_secs(60)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unread_expired_keys_reclaimed_by_writes() {
        let store = MemoryStore::with_sweep_every(4);
        for key in ["a", "b", "c"] {
            store.set(key, 1, Duration::from_millis(10)).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.len(), 3, "nothing reads the stale keys");

        store.set("d", 1, Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("d").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", 5, Duration::from_secs(60)).await.unwrap();
        assert_eq!(other.get("k").await.unwrap(), Some(5));
    }
}
