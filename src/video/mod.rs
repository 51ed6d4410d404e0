//! Video metadata abstraction for Vidsum.
//!
//! Provides a trait-based interface for metadata providers and the
//! identifier extraction used at the edge of the pipeline.

mod youtube;

pub use youtube::YoutubeMetadataProvider;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Canonical metadata for a video, as reported by the provider.
///
/// Counts may be stale; they reflect whatever the provider returned at
/// lookup time and are never refreshed by the core pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video title.
    pub title: String,
    /// Video description.
    pub description: String,
    /// URL of the highest-quality thumbnail.
    pub thumbnail_url: String,
    /// Channel or author name.
    pub channel_title: String,
    /// Publication date.
    pub published_at: DateTime<Utc>,
    /// View count at lookup time.
    pub view_count: u64,
    /// Like count at lookup time.
    pub like_count: u64,
    /// Duration in the provider's native encoding (ISO-8601, e.g. "PT3M33S").
    pub duration: String,
}

/// Trait for video metadata providers.
///
/// `fetch` resolves an external video id to canonical metadata, failing
/// with [`VidsumError::NotFound`](crate::VidsumError::NotFound) when the
/// provider reports no such video.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<VideoMetadata>;
}

fn video_id_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        // Matches various YouTube URL formats and bare video IDs
        Regex::new(
            r"(?x)
            (?:
                # Full YouTube URLs
                (?:https?://)?
                (?:www\.)?
                (?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            # Bare video ID (11 characters)
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex")
    })
}

/// Extract the video id from a URL or bare id.
///
/// Malformed identifiers that happen to look like valid ids are not
/// rejected here; they fail at the metadata provider with `NotFound`.
pub fn extract_video_id(input: &str) -> Option<String> {
    let caps = video_id_regex().captures(input.trim())?;

    // Try group 1 (URL format) then group 2 (bare ID)
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_from_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_from_embed_url() {
        assert_eq!(
            extract_video_id("youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_bare_id() {
        assert_eq!(
            extract_video_id("dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_trims_whitespace() {
        assert_eq!(
            extract_video_id("  dQw4w9WgXcQ\n"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_rejects_garbage() {
        assert_eq!(extract_video_id("not a video"), None);
        assert_eq!(extract_video_id("tooshort"), None);
        assert_eq!(extract_video_id(""), None);
    }
}
