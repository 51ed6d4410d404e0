//! OpenAI-backed summarization engine.

use super::Summarizer;
use crate::config::SummarizationSettings;
use crate::error::{Result, VidsumError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that summarizes video transcripts.";

/// Summarization engine driving OpenAI chat completions.
pub struct OpenAiSummarizer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiSummarizer {
    /// Create a summarizer from settings.
    pub fn new(settings: &SummarizationSettings) -> Self {
        Self {
            client: create_client(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    #[instrument(skip(self, transcript), fields(title = %title))]
    async fn summarize(&self, transcript: &str, title: &str) -> Result<String> {
        info!("Summarizing transcript for video: {}", title);

        let user_prompt = format!(
            "Summarize the following transcript of a video titled \"{}\": {}",
            title, transcript
        );

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| VidsumError::Summarization(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| VidsumError::Summarization(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
            .map_err(|e| VidsumError::Summarization(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            VidsumError::Summarization(format!("Failed to generate summary: {}", e))
        })?;

        let summary = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                VidsumError::Summarization("Empty response from LLM".to_string())
            })?;

        debug!("Generated summary of {} characters", summary.len());
        Ok(summary)
    }
}
