use std::time::{Duration, Instant};

use bytes::Bytes;
use log::debug;
use moka::future::Cache;
use moka::Expiry;

#[derive(Clone, Debug)]
struct Entry {
    value: Bytes,
    ttl: Duration,
}

/// Expires each entry after the TTL its writer supplied. The cache
/// itself carries no TTL; callers decide per item.
struct PerEntryExpiry;

impl Expiry<String, Entry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Bounded in-memory cache for remote repository metadata, shared by
/// every reconciler that consumes it. Absent (`Option::None`) means
/// caching is disabled.
#[derive(Clone, Debug)]
pub struct ArtifactCache {
    inner: Cache<String, Entry>,
}

impl ArtifactCache {
    /// Builds a cache holding at most `max_size` entries and spawns a
    /// janitor task that flushes expired entries every
    /// `purge_interval`. Must be called inside a tokio runtime.
    pub fn new(max_size: u64, purge_interval: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_size)
            .expire_after(PerEntryExpiry)
            .build();

        let janitor = inner.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(purge_interval).await;
                janitor.run_pending_tasks().await;
                debug!(
                    target: "rkdist::cache",
                    "cache purge complete, {} entries live",
                    janitor.entry_count()
                );
            }
        });

        Self { inner }
    }

    pub async fn insert(&self, key: impl Into<String>, value: Bytes, ttl: Duration) {
        self.inner.insert(key.into(), Entry { value, ttl }).await;
    }

    pub async fn get(&self, key: &str) -> Option<Bytes> {
        self.inner.get(key).await.map(|entry| entry.value)
    }

    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}
