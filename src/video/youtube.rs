//! YouTube Data API metadata provider.

use super::{MetadataProvider, VideoMetadata};
use crate::config::YoutubeSettings;
use crate::error::{Result, VidsumError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info};

const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";

/// Metadata provider backed by the YouTube Data API v3.
pub struct YoutubeMetadataProvider {
    client: reqwest::Client,
    api_key: String,
}

impl YoutubeMetadataProvider {
    /// Create a provider from settings.
    ///
    /// Fails with a configuration error when no API key is available from
    /// either the config file or the YOUTUBE_API_KEY environment variable.
    pub fn new(settings: &YoutubeSettings) -> Result<Self> {
        let api_key = settings.resolve_api_key().ok_or_else(|| {
            VidsumError::Config("YouTube API key is not configured".to_string())
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .build()?;

        Ok(Self { client, api_key })
    }

    fn parse_item(video_id: &str, item: &serde_json::Value) -> Result<VideoMetadata> {
        let snippet = &item["snippet"];
        let statistics = &item["statistics"];

        let title = snippet["title"]
            .as_str()
            .unwrap_or("Unknown Title")
            .to_string();

        let description = snippet["description"].as_str().unwrap_or("").to_string();

        // Prefer the high-resolution thumbnail, fall back to the default one
        let thumbnail_url = snippet["thumbnails"]["high"]["url"]
            .as_str()
            .or_else(|| snippet["thumbnails"]["default"]["url"].as_str())
            .unwrap_or("")
            .to_string();

        let channel_title = snippet["channelTitle"].as_str().unwrap_or("").to_string();

        let published_at = snippet["publishedAt"]
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc))
            .ok_or_else(|| {
                VidsumError::Metadata(format!(
                    "Missing or invalid publishedAt for video {}",
                    video_id
                ))
            })?;

        // Statistics arrive as strings in the API response
        let view_count = statistics["viewCount"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let like_count = statistics["likeCount"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let duration = item["contentDetails"]["duration"]
            .as_str()
            .unwrap_or("")
            .to_string();

        Ok(VideoMetadata {
            title,
            description,
            thumbnail_url,
            channel_title,
            published_at,
            view_count,
            like_count,
            duration,
        })
    }
}

#[async_trait]
impl MetadataProvider for YoutubeMetadataProvider {
    async fn fetch(&self, video_id: &str) -> Result<VideoMetadata> {
        info!("Fetching metadata for video {}", video_id);

        let response = self
            .client
            .get(VIDEOS_ENDPOINT)
            .query(&[
                ("part", "snippet,contentDetails,statistics"),
                ("id", video_id),
                ("key", &self.api_key),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;

        let items = body["items"].as_array();
        let item = items
            .and_then(|items| items.first())
            .ok_or_else(|| VidsumError::NotFound(video_id.to_string()))?;

        debug!("Metadata resolved for video {}", video_id);
        Self::parse_item(video_id, item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> serde_json::Value {
        serde_json::json!({
            "snippet": {
                "title": "Sample",
                "description": "A sample video",
                "channelTitle": "Sample Channel",
                "publishedAt": "2009-10-25T06:57:33Z",
                "thumbnails": {
                    "default": { "url": "https://img.example/default.jpg" },
                    "high": { "url": "https://img.example/high.jpg" }
                }
            },
            "statistics": {
                "viewCount": "1000000",
                "likeCount": "50000"
            },
            "contentDetails": {
                "duration": "PT3M33S"
            }
        })
    }

    #[test]
    fn test_parse_item() {
        let meta = YoutubeMetadataProvider::parse_item("dQw4w9WgXcQ", &sample_item()).unwrap();
        assert_eq!(meta.title, "Sample");
        assert_eq!(meta.thumbnail_url, "https://img.example/high.jpg");
        assert_eq!(meta.view_count, 1_000_000);
        assert_eq!(meta.like_count, 50_000);
        assert_eq!(meta.duration, "PT3M33S");
    }

    #[test]
    fn test_parse_item_falls_back_to_default_thumbnail() {
        let mut item = sample_item();
        item["snippet"]["thumbnails"]
            .as_object_mut()
            .unwrap()
            .remove("high");

        let meta = YoutubeMetadataProvider::parse_item("dQw4w9WgXcQ", &item).unwrap();
        assert_eq!(meta.thumbnail_url, "https://img.example/default.jpg");
    }

    #[test]
    fn test_parse_item_requires_published_at() {
        let mut item = sample_item();
        item["snippet"]
            .as_object_mut()
            .unwrap()
            .remove("publishedAt");

        assert!(YoutubeMetadataProvider::parse_item("dQw4w9WgXcQ", &item).is_err());
    }
}
