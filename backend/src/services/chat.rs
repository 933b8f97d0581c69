//! Chat completion proxy
//!
//! Forwards a conversation to the OpenAI-compatible Qwen endpoint and
//! returns the text of the first choice. One request per call: no retry,
//! no streaming.

use crate::config::AiProviderConfig;
use crate::database::Repository;
use crate::error::{AppError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// A single chat turn in OpenAI wire format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Proxy request: either one `message` or a full `messages` list
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    /// Falls back to the stored AI config when absent
    pub api_key: Option<String>,
    pub message: Option<String>,
    pub messages: Option<Vec<ChatMessage>>,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct ChatProxy {
    client: Client,
    config: AiProviderConfig,
    repo: Repository,
}

impl ChatProxy {
    pub fn new(config: AiProviderConfig, repo: Repository) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            repo,
        })
    }

    /// Send the request upstream and return the first completion's text
    pub async fn complete(&self, req: ChatRequest) -> Result<String> {
        let messages = collect_messages(&req)?;
        let api_key = self.resolve_api_key(req.api_key.as_deref()).await?;

        tracing::info!(
            "Calling chat completion: model={} messages={}",
            self.config.model,
            messages.len()
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&api_key)
            .json(&CompletionRequest {
                model: &self.config.model,
                messages: &messages,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            tracing::warn!("Chat completion failed with status {}", status);
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::UpstreamFormat(format!("invalid JSON: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::UpstreamFormat("response contained no choices".to_string()))?;

        tracing::debug!("Chat completion returned {} characters", content.chars().count());
        Ok(content)
    }

    async fn resolve_api_key(&self, supplied: Option<&str>) -> Result<String> {
        if let Some(key) = supplied.map(str::trim).filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }

        match self.repo.get_ai_config().await? {
            Some(config) if !config.api_key.trim().is_empty() => Ok(config.api_key),
            _ => Err(AppError::Validation("Missing API key".to_string())),
        }
    }
}

/// Messages to forward: the explicit list wins over the single message
fn collect_messages(req: &ChatRequest) -> Result<Vec<ChatMessage>> {
    if let Some(messages) = req.messages.as_ref().filter(|m| !m.is_empty()) {
        return Ok(messages.clone());
    }

    match req.message.as_deref().map(str::trim) {
        Some(message) if !message.is_empty() => Ok(vec![ChatMessage {
            role: "user".to_string(),
            content: message.to_string(),
        }]),
        _ => Err(AppError::Validation("Missing message".to_string())),
    }
}
