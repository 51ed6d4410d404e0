//! SQLite-based catalog implementation.

use super::{CatalogStore, VideoRecord};
use crate::error::{Result, VidsumError};
use crate::video::VideoMetadata;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS videos (
        external_id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        thumbnail_url TEXT NOT NULL,
        channel_title TEXT NOT NULL,
        published_at TEXT NOT NULL,
        view_count INTEGER NOT NULL,
        like_count INTEGER NOT NULL,
        duration TEXT NOT NULL,
        summary TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
"#;

/// SQLite-based catalog store.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Create a new SQLite catalog.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite catalog at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite catalog (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<VideoRecord> {
        Ok(VideoRecord {
            external_id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            thumbnail_url: row.get(3)?,
            channel_title: row.get(4)?,
            published_at: parse_timestamp(row, 5)?,
            view_count: row.get::<_, i64>(6)? as u64,
            like_count: row.get::<_, i64>(7)? as u64,
            duration: row.get(8)?,
            summary: row.get(9)?,
            created_at: parse_timestamp(row, 10)?,
            updated_at: parse_timestamp(row, 11)?,
        })
    }

    fn find_sync(conn: &Connection, external_id: &str) -> Result<Option<VideoRecord>> {
        let mut stmt = conn.prepare(
            "SELECT external_id, title, description, thumbnail_url, channel_title,
                    published_at, view_count, like_count, duration, summary,
                    created_at, updated_at
             FROM videos WHERE external_id = ?1",
        )?;

        let mut rows = stmt.query_map(params![external_id], Self::row_to_record)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<VideoRecord>> {
        let conn = self.conn.lock().unwrap();
        Self::find_sync(&conn, external_id)
    }

    async fn create(&self, external_id: &str, metadata: &VideoMetadata) -> Result<VideoRecord> {
        let record = VideoRecord::from_metadata(external_id, metadata);

        let conn = self.conn.lock().unwrap();
        let result = conn.execute(
            "INSERT INTO videos (external_id, title, description, thumbnail_url,
                                 channel_title, published_at, view_count, like_count,
                                 duration, summary, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL, ?10, ?11)",
            params![
                record.external_id,
                record.title,
                record.description,
                record.thumbnail_url,
                record.channel_title,
                record.published_at.to_rfc3339(),
                record.view_count as i64,
                record.like_count as i64,
                record.duration,
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => Ok(record),
            Err(e) if is_unique_violation(&e) => Err(VidsumError::Conflict(format!(
                "Record for {} already exists",
                external_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_summary(&self, external_id: &str, summary: &str) -> Result<VideoRecord> {
        let conn = self.conn.lock().unwrap();

        let changed = conn.execute(
            "UPDATE videos SET summary = ?1, updated_at = ?2 WHERE external_id = ?3",
            params![summary, Utc::now().to_rfc3339(), external_id],
        )?;

        if changed == 0 {
            return Err(VidsumError::NotFound(format!(
                "No catalog record for {}",
                external_id
            )));
        }

        Self::find_sync(&conn, external_id)?.ok_or_else(|| {
            VidsumError::NotFound(format!("No catalog record for {}", external_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::sample_metadata;

    #[tokio::test]
    async fn test_create_find_roundtrip() {
        let catalog = SqliteCatalog::in_memory().unwrap();
        let metadata = sample_metadata("Sample");

        let created = catalog.create("dQw4w9WgXcQ", &metadata).await.unwrap();
        let found = catalog
            .find_by_external_id("dQw4w9WgXcQ")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.external_id, created.external_id);
        assert_eq!(found.title, "Sample");
        assert_eq!(found.view_count, 1_000_000);
        assert_eq!(found.published_at, metadata.published_at);
        assert!(found.summary.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_create_is_conflict() {
        let catalog = SqliteCatalog::in_memory().unwrap();
        let metadata = sample_metadata("Sample");

        catalog.create("dQw4w9WgXcQ", &metadata).await.unwrap();
        let err = catalog.create("dQw4w9WgXcQ", &metadata).await.unwrap_err();
        assert!(matches!(err, VidsumError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_summary_persists() {
        let catalog = SqliteCatalog::in_memory().unwrap();
        catalog
            .create("dQw4w9WgXcQ", &sample_metadata("Sample"))
            .await
            .unwrap();

        let updated = catalog
            .update_summary("dQw4w9WgXcQ", "A short summary.")
            .await
            .unwrap();
        assert_eq!(updated.summary.as_deref(), Some("A short summary."));

        let found = catalog
            .find_by_external_id("dQw4w9WgXcQ")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.summary.as_deref(), Some("A short summary."));
    }

    #[tokio::test]
    async fn test_update_summary_missing_record() {
        let catalog = SqliteCatalog::in_memory().unwrap();
        let err = catalog
            .update_summary("dQw4w9WgXcQ", "A short summary.")
            .await
            .unwrap_err();
        assert!(matches!(err, VidsumError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_on_disk_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");

        {
            let catalog = SqliteCatalog::new(&path).unwrap();
            catalog
                .create("dQw4w9WgXcQ", &sample_metadata("Sample"))
                .await
                .unwrap();
        }

        let catalog = SqliteCatalog::new(&path).unwrap();
        let found = catalog
            .find_by_external_id("dQw4w9WgXcQ")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.title, "Sample");
    }
}
