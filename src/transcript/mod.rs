//! Transcript provider abstraction for Vidsum.
//!
//! Transcript extraction is treated as an external capability with a fixed
//! contract: given a video id, produce the full transcript text or fail
//! with `TranscriptUnavailable`. How the text is obtained is the
//! implementation's business.

mod timedtext;

pub use timedtext::TimedTextProvider;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Fetch the transcript text for a video.
    ///
    /// Fails with [`VidsumError::TranscriptUnavailable`](crate::VidsumError::TranscriptUnavailable)
    /// when no transcript can be produced for the video.
    async fn fetch(&self, video_id: &str) -> Result<String>;
}
