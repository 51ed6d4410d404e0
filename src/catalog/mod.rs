//! Persistent video catalog for Vidsum.
//!
//! Provides a trait-based interface for catalog store backends. The catalog
//! holds at most one record per external video id; records are created once
//! from provider metadata and mutated only to attach a computed summary.

mod memory;
mod sqlite;

pub use memory::MemoryCatalog;
pub use sqlite::SqliteCatalog;

use crate::error::Result;
use crate::video::VideoMetadata;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One distinct video's known state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Stable external identifier, unique key.
    pub external_id: String,
    /// Video title.
    pub title: String,
    /// Video description.
    pub description: String,
    /// Thumbnail URL.
    pub thumbnail_url: String,
    /// Channel or author name.
    pub channel_title: String,
    /// Publication date.
    pub published_at: DateTime<Utc>,
    /// View count at metadata lookup time (may be stale).
    pub view_count: u64,
    /// Like count at metadata lookup time (may be stale).
    pub like_count: u64,
    /// Duration in the provider's native encoding.
    pub duration: String,
    /// Computed summary; absent until the pipeline produces one.
    pub summary: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl VideoRecord {
    /// Build a fresh record from provider metadata, without a summary.
    pub fn from_metadata(external_id: &str, metadata: &VideoMetadata) -> Self {
        let now = Utc::now();
        Self {
            external_id: external_id.to_string(),
            title: metadata.title.clone(),
            description: metadata.description.clone(),
            thumbnail_url: metadata.thumbnail_url.clone(),
            channel_title: metadata.channel_title.clone(),
            published_at: metadata.published_at,
            view_count: metadata.view_count,
            like_count: metadata.like_count,
            duration: metadata.duration.clone(),
            summary: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Trait for catalog store implementations.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Look up a record by external video id.
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<VideoRecord>>;

    /// Persist a new record built from provider metadata.
    ///
    /// Fails with [`VidsumError::Conflict`](crate::VidsumError::Conflict)
    /// when a record with the same external id already exists; the caller
    /// recovers by re-reading rather than treating the conflict as fatal.
    async fn create(&self, external_id: &str, metadata: &VideoMetadata) -> Result<VideoRecord>;

    /// Attach a computed summary to an existing record.
    ///
    /// Idempotent: writing the same text twice only bumps `updated_at`.
    /// Fails with `NotFound` if no record exists for the id.
    async fn update_summary(&self, external_id: &str, summary: &str) -> Result<VideoRecord>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn sample_metadata(title: &str) -> VideoMetadata {
        VideoMetadata {
            title: title.to_string(),
            description: "A sample video".to_string(),
            thumbnail_url: "https://img.example/high.jpg".to_string(),
            channel_title: "Sample Channel".to_string(),
            published_at: "2009-10-25T06:57:33Z".parse().unwrap(),
            view_count: 1_000_000,
            like_count: 50_000,
            duration: "PT3M33S".to_string(),
        }
    }
}
