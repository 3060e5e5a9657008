//! OpenAI-compatible chat completion client.

use async_trait::async_trait;
use derive_builder::Builder;
use derive_getters::Getters;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use vignette_error::{HttpError, VignetteResult};
use vignette_interface::TextCompletion;

/// Model used for segmentation and prompt synthesis.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4-turbo-preview";

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System instruction
    System,
    /// User content
    User,
    /// Model reply
    Assistant,
}

/// One message in a chat completion conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatMessage {
    /// Message role
    role: ChatRole,
    /// Message content
    content: String,
}

impl ChatMessage {
    /// Creates a new builder for `ChatMessage`.
    pub fn builder() -> ChatMessageBuilder {
        ChatMessageBuilder::default()
    }
}

/// Chat completion request body.
#[derive(Debug, Clone, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatRequest {
    /// Model identifier
    model: String,
    /// Conversation messages
    messages: Vec<ChatMessage>,
    /// Maximum tokens to generate
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl ChatRequest {
    /// Creates a new builder for `ChatRequest`.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// One completion choice in a chat response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The generated message
    pub message: ChatMessage,
}

/// Chat completion response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Completion choices; the first carries the reply
    pub choices: Vec<ChatChoice>,
}

/// OpenAI-compatible chat completion client.
///
/// Any endpoint exposing the `/chat/completions` shape works here; the
/// base URL is configurable so self-hosted gateways can stand in for the
/// public API.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ChatClient {
    /// Creates a new chat client against the given base URL.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        debug!("Creating new chat completion client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Sends a raw chat completion request.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    pub async fn chat(&self, request: &ChatRequest) -> VignetteResult<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!(url = %url, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send chat completion request");
                HttpError::new(format!("Chat request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Chat completion endpoint returned error");
            return Err(HttpError::new(format!("Chat API error {status}: {body}")).into());
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse chat completion response");
            HttpError::new(format!("Failed to parse chat response: {e}"))
        })?;

        Ok(chat_response)
    }
}

#[async_trait]
impl TextCompletion for ChatClient {
    #[instrument(skip(self, system_instruction, user_text), fields(model = %self.model))]
    async fn complete(
        &self,
        system_instruction: &str,
        user_text: &str,
    ) -> VignetteResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: ChatRole::System,
                    content: system_instruction.to_string(),
                },
                ChatMessage {
                    role: ChatRole::User,
                    content: user_text.to_string(),
                },
            ],
            max_tokens: Some(2000),
            temperature: Some(0.7),
        };

        let response = self.chat(&request).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| HttpError::new("Chat response contained no choices"))?;

        debug!(content_len = content.len(), "Received chat completion");
        Ok(content)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
