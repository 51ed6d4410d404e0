//! Summarization engine abstraction for Vidsum.

mod openai;

pub use openai::OpenAiSummarizer;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for summarization engines.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a natural-language summary of a transcript.
    ///
    /// The title gives the model context about what the transcript covers.
    /// Fails with [`VidsumError::Summarization`](crate::VidsumError::Summarization)
    /// on any provider failure (quota, auth, malformed response).
    async fn summarize(&self, transcript: &str, title: &str) -> Result<String>;
}
