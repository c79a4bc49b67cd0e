//! Time-bounded in-memory cache fronting the title scraper
use crate::error::Result;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Default time-to-live for cached entries (1 hour)
pub const DEFAULT_TTL_MILLIS: u64 = 3_600_000;

/// Source of the current time in milliseconds
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: AtomicU64::new(start_millis),
        }
    }

    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// One cached value. `fetched_at` is only set by a successful refresh; fallback
/// values keep the previous timestamp so the next lookup retries the live path.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub fetched_at: Option<u64>,
}

/// Cache statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub fresh: usize,
    pub stale: usize,
}

/// Keyed cache with a fixed TTL. No lock is held across a refresh, so concurrent
/// misses on one key each refresh and the last write wins.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    ttl_millis: u64,
    clock: Arc<dyn Clock>,
}

impl<V: Clone + Send + Sync> TtlCache<V> {
    /// Create a cache on the wall clock
    pub fn new(ttl_millis: u64) -> Self {
        Self::with_clock(ttl_millis, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl_millis: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl_millis,
            clock,
        }
    }

    pub fn ttl_millis(&self) -> u64 {
        self.ttl_millis
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: u64) -> bool {
        entry
            .fetched_at
            .map_or(false, |fetched_at| now.saturating_sub(fetched_at) < self.ttl_millis)
    }

    /// Return the cached value for `key`, refreshing it when missing or expired.
    ///
    /// A successful refresh is stored with the current timestamp. A failed refresh
    /// stores and returns `fallback()` without touching the timestamp.
    pub async fn get_or_refresh<F, Fut, D>(&self, key: &str, refresh: F, fallback: D) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
        D: FnOnce() -> V,
    {
        let now = self.clock.now_millis();
        let previous_fetch = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if self.is_fresh(entry, now) => {
                    debug!("📚 Cache hit for {}", key);
                    return entry.value.clone();
                }
                Some(entry) => entry.fetched_at,
                None => None,
            }
        };

        match refresh().await {
            Ok(value) => {
                info!("🔄 Refreshed cache entry {}", key);
                self.entries.write().await.insert(
                    key.to_string(),
                    CacheEntry {
                        value: value.clone(),
                        fetched_at: Some(now),
                    },
                );
                value
            }
            Err(e) => {
                warn!("Refresh for {} failed, serving fallback: {}", key, e);
                let value = fallback();
                self.entries.write().await.insert(
                    key.to_string(),
                    CacheEntry {
                        value: value.clone(),
                        fetched_at: previous_fetch,
                    },
                );
                value
            }
        }
    }

    /// Snapshot of the entry stored under `key`
    pub async fn entry(&self, key: &str) -> Option<CacheEntry<V>> {
        self.entries.read().await.get(key).cloned()
    }

    /// Drop one entry
    pub async fn invalidate(&self, key: &str) -> bool {
        let removed = self.entries.write().await.remove(key).is_some();
        if removed {
            info!("🗑️ Invalidated cache entry {}", key);
        }
        removed
    }

    /// Drop every entry
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let cleared = entries.len();
        entries.clear();
        if cleared > 0 {
            info!("🧹 Cleared {} cache entries", cleared);
        }
        cleared
    }

    pub async fn stats(&self) -> CacheStats {
        let now = self.clock.now_millis();
        let entries = self.entries.read().await;
        let fresh = entries.values().filter(|e| self.is_fresh(e, now)).count();
        CacheStats {
            entries: entries.len(),
            fresh,
            stale: entries.len() - fresh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TitleError;
    use std::sync::atomic::AtomicUsize;

    const T0: u64 = 1_700_000_000_000;

    fn cache_at(clock: &Arc<ManualClock>) -> TtlCache<Vec<String>> {
        TtlCache::with_clock(DEFAULT_TTL_MILLIS, clock.clone())
    }

    async fn lookup(cache: &TtlCache<Vec<String>>, calls: &AtomicUsize, value: &str) -> Vec<String> {
        cache
            .get_or_refresh(
                "Trap",
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![value.to_string()])
                },
                Vec::new,
            )
            .await
    }

    #[tokio::test]
    async fn test_fresh_entry_is_served_without_refresh() {
        let clock = Arc::new(ManualClock::new(T0));
        let cache = cache_at(&clock);
        let calls = AtomicUsize::new(0);

        assert_eq!(lookup(&cache, &calls, "first").await, vec!["first"]);
        clock.set(T0 + 3_599_999);
        assert_eq!(lookup(&cache, &calls, "second").await, vec!["first"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refreshed() {
        let clock = Arc::new(ManualClock::new(T0));
        let cache = cache_at(&clock);
        let calls = AtomicUsize::new(0);

        lookup(&cache, &calls, "first").await;
        clock.set(T0 + 3_600_001);
        assert_eq!(lookup(&cache, &calls, "second").await, vec!["second"]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.entry("Trap").await.unwrap().fetched_at, Some(T0 + 3_600_001));
    }

    #[tokio::test]
    async fn test_expiry_boundary_is_exclusive() {
        let clock = Arc::new(ManualClock::new(T0));
        let cache = cache_at(&clock);
        let calls = AtomicUsize::new(0);

        lookup(&cache, &calls, "first").await;
        clock.advance(DEFAULT_TTL_MILLIS);
        lookup(&cache, &calls, "second").await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_serves_fallback_and_keeps_timestamp() {
        let clock = Arc::new(ManualClock::new(T0));
        let cache = cache_at(&clock);
        let calls = AtomicUsize::new(0);

        lookup(&cache, &calls, "first").await;
        clock.advance(DEFAULT_TTL_MILLIS + 1);

        let value = cache
            .get_or_refresh(
                "Trap",
                || async { Err::<Vec<String>, _>(TitleError::EmptyResult("Trap".to_string())) },
                || vec!["Neon Dreams".to_string()],
            )
            .await;

        assert_eq!(value, vec!["Neon Dreams"]);
        let entry = cache.entry("Trap").await.unwrap();
        assert_eq!(entry.fetched_at, Some(T0));
        assert_eq!(entry.value, vec!["Neon Dreams"]);

        // Still stale, so the next lookup goes back to the live path
        assert_eq!(lookup(&cache, &calls, "live").await, vec!["live"]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_on_empty_cache_is_not_cached_as_fresh() {
        let clock = Arc::new(ManualClock::new(T0));
        let cache = cache_at(&clock);

        cache
            .get_or_refresh(
                "Soul",
                || async { Err::<Vec<String>, _>(TitleError::EmptyResult("Soul".to_string())) },
                Vec::new,
            )
            .await;

        assert_eq!(cache.entry("Soul").await.unwrap().fetched_at, None);
        assert_eq!(cache.stats().await, CacheStats { entries: 1, fresh: 0, stale: 1 });
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let clock = Arc::new(ManualClock::new(T0));
        let cache = cache_at(&clock);
        let calls = AtomicUsize::new(0);

        lookup(&cache, &calls, "first").await;
        assert!(cache.invalidate("Trap").await);
        assert!(!cache.invalidate("Trap").await);

        lookup(&cache, &calls, "again").await;
        assert_eq!(cache.clear().await, 1);
        assert_eq!(cache.stats().await, CacheStats::default());
    }
}
