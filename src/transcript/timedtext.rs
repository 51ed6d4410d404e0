//! Transcript provider backed by YouTube's timedtext captions.

use super::TranscriptProvider;
use crate::config::YoutubeSettings;
use crate::error::{Result, VidsumError};
use async_trait::async_trait;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, info};

const TIMEDTEXT_ENDPOINT: &str = "https://video.google.com/timedtext";

/// Fetches caption tracks from the public timedtext endpoint and flattens
/// them into plain transcript text.
pub struct TimedTextProvider {
    client: reqwest::Client,
    language: String,
    segment_regex: Regex,
}

impl TimedTextProvider {
    pub fn new(settings: &YoutubeSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .build()?;

        let segment_regex =
            Regex::new(r"(?s)<text[^>]*>(.*?)</text>").expect("Invalid regex");

        Ok(Self {
            client,
            language: settings.transcript_language.clone(),
            segment_regex,
        })
    }

    /// Flatten a timedtext XML document into transcript text.
    fn extract_text(&self, xml: &str) -> String {
        let mut parts = Vec::new();
        for caps in self.segment_regex.captures_iter(xml) {
            let segment = unescape(&caps[1]);
            let segment = segment.trim();
            if !segment.is_empty() {
                parts.push(segment.to_string());
            }
        }
        parts.join(" ")
    }
}

fn unescape(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[async_trait]
impl TranscriptProvider for TimedTextProvider {
    async fn fetch(&self, video_id: &str) -> Result<String> {
        info!("Fetching transcript for video {}", video_id);

        let response = self
            .client
            .get(TIMEDTEXT_ENDPOINT)
            .query(&[("lang", self.language.as_str()), ("v", video_id)])
            .send()
            .await
            .map_err(|e| {
                VidsumError::TranscriptUnavailable(format!(
                    "Caption request for {} failed: {}",
                    video_id, e
                ))
            })?;

        if !response.status().is_success() {
            return Err(VidsumError::TranscriptUnavailable(format!(
                "Caption request for {} returned {}",
                video_id,
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            VidsumError::TranscriptUnavailable(format!(
                "Caption body for {} unreadable: {}",
                video_id, e
            ))
        })?;

        let transcript = self.extract_text(&body);

        // The endpoint returns an empty document for videos without captions
        if transcript.is_empty() {
            return Err(VidsumError::TranscriptUnavailable(format!(
                "No captions available for video {}",
                video_id
            )));
        }

        debug!(
            "Transcript for {} is {} characters",
            video_id,
            transcript.len()
        );
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> TimedTextProvider {
        TimedTextProvider::new(&YoutubeSettings::default()).unwrap()
    }

    #[test]
    fn test_extract_text_joins_segments() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
            <transcript>
                <text start="0" dur="2.5">hello world</text>
                <text start="2.5" dur="3">second segment</text>
            </transcript>"#;

        assert_eq!(provider().extract_text(xml), "hello world second segment");
    }

    #[test]
    fn test_extract_text_unescapes_entities() {
        let xml = r#"<transcript><text start="0" dur="1">Tom &amp; Jerry &#39;live&#39;</text></transcript>"#;
        assert_eq!(provider().extract_text(xml), "Tom & Jerry 'live'");
    }

    #[test]
    fn test_extract_text_empty_document() {
        assert_eq!(provider().extract_text("<transcript></transcript>"), "");
        assert_eq!(provider().extract_text(""), "");
    }
}
