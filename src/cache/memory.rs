//! In-memory TTL cache implementation.

use super::SummaryCache;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// In-memory summary cache with per-key expiry.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Create a new in-memory cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SummaryCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().unwrap();

        match entries.get(key) {
            Some(entry) if entry.expires_at > Utc::now() => {
                debug!("Cache hit for key: {}", key);
                Some(entry.value.clone())
            }
            Some(_) => {
                // Expired entries are reaped lazily on lookup
                entries.remove(key);
                debug!("Cache miss (expired) for key: {}", key);
                None
            }
            None => {
                debug!("Cache miss for key: {}", key);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) {
        let Ok(ttl) = ChronoDuration::from_std(ttl) else {
            return;
        };

        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Utc::now() + ttl,
            },
        );
        debug!("Cache set for key: {}", key);
    }

    async fn delete(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
        debug!("Cache deleted for key: {}", key);
    }
}
