//! Best-effort TTL cache for computed summaries.
//!
//! The cache is an expendable projection of catalog state: a present entry
//! means the computation completed before its expiry; an absent entry means
//! nothing. The trait is therefore infallible at the boundary — transport
//! or serialization faults degrade to a miss or a dropped write, logged but
//! never raised. The pipeline must work correctly (just slower) with the
//! cache entirely unavailable.

mod memory;
mod sqlite;

pub use memory::MemoryCache;
pub use sqlite::SqliteCache;

use async_trait::async_trait;
use std::time::Duration;

/// Cache key for a video's computed summary.
///
/// The `summary:{id}` format is part of the observable contract: persisted
/// cache state remains valid across restarts of either the cache layer or
/// the service.
pub fn summary_key(video_id: &str) -> String {
    format!("summary:{}", video_id)
}

/// Trait for summary cache implementations. Every operation is best-effort.
#[async_trait]
pub trait SummaryCache: Send + Sync {
    /// Look up a cached value. Faults report as a miss.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a value with a TTL, replacing any existing entry wholesale.
    /// Faults drop the write.
    async fn set(&self, key: &str, value: &str, ttl: Duration);

    /// Remove an entry. Faults drop the delete.
    async fn delete(&self, key: &str);
}

/// Cache implementation that stores nothing.
///
/// Used when caching is disabled; every `get` is a miss and writes vanish.
pub struct NoopCache;

#[async_trait]
impl SummaryCache for NoopCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) {}

    async fn delete(&self, _key: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_key_format() {
        assert_eq!(summary_key("dQw4w9WgXcQ"), "summary:dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn test_noop_cache_never_stores() {
        let cache = NoopCache;
        cache.set("summary:x", "value", Duration::from_secs(60)).await;
        assert!(cache.get("summary:x").await.is_none());
    }
}
