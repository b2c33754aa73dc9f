use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::info;

/// Emits object lifecycle events into the process log, standing in for
/// the cluster event API the reconcilers report through.
#[derive(Clone, Default)]
pub struct EventRecorder;

impl EventRecorder {
    pub fn event(&self, object: &str, reason: &str, message: &str) {
        info!(target: "rkdist::events", "{object}: {reason}: {message}");
    }
}

#[derive(Default)]
struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

/// Counts cache traffic on behalf of the reconcilers sharing the
/// artifact cache.
#[derive(Clone, Default)]
pub struct CacheRecorder {
    counters: Arc<CacheCounters>,
}

impl CacheRecorder {
    pub fn record_hit(&self) {
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.counters.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.counters.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.counters.misses.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.counters.evictions.load(Ordering::Relaxed)
    }
}

/// The recorders every reconciler receives at registration.
#[derive(Clone, Default)]
pub struct Recorders {
    pub events: EventRecorder,
    pub cache: CacheRecorder,
}
