//! In-memory catalog implementation.
//!
//! Useful for testing and cache-less single-process deployments.

use super::{CatalogStore, VideoRecord};
use crate::error::{Result, VidsumError};
use crate::video::VideoMetadata;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory catalog store.
pub struct MemoryCatalog {
    records: RwLock<HashMap<String, VideoRecord>>,
}

impl MemoryCatalog {
    /// Create a new in-memory catalog.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<VideoRecord>> {
        let records = self.records.read().unwrap();
        Ok(records.get(external_id).cloned())
    }

    async fn create(&self, external_id: &str, metadata: &VideoMetadata) -> Result<VideoRecord> {
        let mut records = self.records.write().unwrap();
        if records.contains_key(external_id) {
            return Err(VidsumError::Conflict(format!(
                "Record for {} already exists",
                external_id
            )));
        }

        let record = VideoRecord::from_metadata(external_id, metadata);
        records.insert(external_id.to_string(), record.clone());
        Ok(record)
    }

    async fn update_summary(&self, external_id: &str, summary: &str) -> Result<VideoRecord> {
        let mut records = self.records.write().unwrap();
        let record = records.get_mut(external_id).ok_or_else(|| {
            VidsumError::NotFound(format!("No catalog record for {}", external_id))
        })?;

        record.summary = Some(summary.to_string());
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::sample_metadata;

    #[tokio::test]
    async fn test_create_and_find() {
        let catalog = MemoryCatalog::new();
        let metadata = sample_metadata("Sample");

        assert!(catalog
            .find_by_external_id("dQw4w9WgXcQ")
            .await
            .unwrap()
            .is_none());

        let created = catalog.create("dQw4w9WgXcQ", &metadata).await.unwrap();
        assert_eq!(created.title, "Sample");
        assert!(created.summary.is_none());

        let found = catalog
            .find_by_external_id("dQw4w9WgXcQ")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.external_id, "dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn test_create_conflict() {
        let catalog = MemoryCatalog::new();
        let metadata = sample_metadata("Sample");

        catalog.create("dQw4w9WgXcQ", &metadata).await.unwrap();
        let err = catalog.create("dQw4w9WgXcQ", &metadata).await.unwrap_err();
        assert!(matches!(err, VidsumError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_summary() {
        let catalog = MemoryCatalog::new();
        catalog
            .create("dQw4w9WgXcQ", &sample_metadata("Sample"))
            .await
            .unwrap();

        let updated = catalog
            .update_summary("dQw4w9WgXcQ", "A short summary.")
            .await
            .unwrap();
        assert_eq!(updated.summary.as_deref(), Some("A short summary."));
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_update_summary_missing_record() {
        let catalog = MemoryCatalog::new();
        let err = catalog
            .update_summary("dQw4w9WgXcQ", "A short summary.")
            .await
            .unwrap_err();
        assert!(matches!(err, VidsumError::NotFound(_)));
    }
}
