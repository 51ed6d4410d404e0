//! SQLite-based TTL cache implementation.
//!
//! Persisting the cache means the `summary:{id}` keys and their expiries
//! survive process restarts. Faults from the underlying store never escape
//! the trait boundary; they are logged and reported as misses or dropped
//! writes.

use super::SummaryCache;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS cache_entries (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        expires_at TEXT NOT NULL
    );
"#;

/// SQLite-based summary cache.
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Create a new SQLite cache.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite cache at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite cache (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn try_get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();

        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT value, expires_at FROM cache_entries WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((value, expires_at)) = row else {
            return Ok(None);
        };

        let expires_at = DateTime::parse_from_rfc3339(&expires_at)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        if expires_at <= Utc::now() {
            // Expired entries are reaped lazily on lookup
            conn.execute("DELETE FROM cache_entries WHERE key = ?1", params![key])?;
            return Ok(None);
        }

        Ok(Some(value))
    }

    fn try_set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let ttl = ChronoDuration::from_std(ttl).unwrap_or(ChronoDuration::zero());
        let expires_at = (Utc::now() + ttl).to_rfc3339();

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO cache_entries (key, value, expires_at)
             VALUES (?1, ?2, ?3)",
            params![key, value, expires_at],
        )?;
        Ok(())
    }

    fn try_delete(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM cache_entries WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[async_trait]
impl SummaryCache for SqliteCache {
    async fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key) {
            Ok(Some(value)) => {
                debug!("Cache hit for key: {}", key);
                Some(value)
            }
            Ok(None) => {
                debug!("Cache miss for key: {}", key);
                None
            }
            Err(e) => {
                warn!("Error getting cache for key {}: {}", key, e);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) {
        match self.try_set(key, value, ttl) {
            Ok(()) => debug!("Cache set for key: {}", key),
            Err(e) => warn!("Error setting cache for key {}: {}", key, e),
        }
    }

    async fn delete(&self, key: &str) {
        match self.try_delete(key) {
            Ok(()) => debug!("Cache deleted for key: {}", key),
            Err(e) => warn!("Error deleting cache for key {}: {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let cache = SqliteCache::in_memory().unwrap();
        cache
            .set("summary:abc", "payload", Duration::from_secs(60))
            .await;
        assert_eq!(cache.get("summary:abc").await.as_deref(), Some("payload"));
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = SqliteCache::in_memory().unwrap();
        cache
            .set("summary:abc", "payload", Duration::from_secs(0))
            .await;
        assert!(cache.get("summary:abc").await.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = SqliteCache::in_memory().unwrap();
        cache
            .set("summary:abc", "payload", Duration::from_secs(60))
            .await;
        cache.delete("summary:abc").await;
        assert!(cache.get("summary:abc").await.is_none());
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");

        {
            let cache = SqliteCache::new(&path).unwrap();
            cache
                .set("summary:abc", "payload", Duration::from_secs(3600))
                .await;
        }

        let cache = SqliteCache::new(&path).unwrap();
        assert_eq!(cache.get("summary:abc").await.as_deref(), Some("payload"));
    }
}
