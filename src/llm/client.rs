use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::prompts::{few_shot_messages, SYSTEM_PROMPT};

/// Configuration for the chat-completion client
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// API key (from TP_API_KEY env var)
    pub api_key: String,
    /// Base URL of the OpenAI-compatible endpoint
    pub base_url: String,
    /// Model to use (e.g., "typhoon-v2.1-12b-instruct")
    pub model: String,
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_tokens: u32,
}

impl ChatConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("TP_API_KEY").context("TP_API_KEY environment variable not set")?;
        let base_url = std::env::var("TP_BASE_URL")
            .unwrap_or_else(|_| "https://api.opentyphoon.ai/v1".to_string());

        Ok(Self {
            api_key,
            base_url,
            model: "typhoon-v2.1-12b-instruct".to_string(),
            temperature: 0.3,
            max_tokens: 700,
        })
    }

    /// Create with custom settings
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            api_key,
            base_url,
            model,
            temperature: 0.3,
            max_tokens: 700,
        }
    }
}

/// A single chat message in the completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

/// Client for an OpenAI-compatible chat-completions endpoint
pub struct ChatClient {
    client: Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Send the serialized survey block for summarization and scoring.
    ///
    /// The system instruction and the few-shot exchange are fixed; the
    /// survey block is the only variable content. Returns the model's
    /// free-form text response.
    pub async fn summarize_survey(&self, survey_block: &str) -> Result<String> {
        let mut messages = vec![ChatMessage::new("system", SYSTEM_PROMPT)];
        messages.extend(few_shot_messages());
        messages.push(ChatMessage::new("user", survey_block));
        self.send(messages).await
    }

    async fn send(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            messages,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to chat endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Chat endpoint error: {} - {}", status, body);
        }

        let response: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .context("No choices in chat completion response")
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: String,
}
