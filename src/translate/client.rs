use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::error::{Result, HonyakuError};

/// A chat-completion capability taking a single user message
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send `prompt` as one user-role message to `model` and return the reply content
    async fn chat(&self, model: &str, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Ollama `/api/chat` client
pub struct OllamaClient {
    client: Client,
    endpoint: String,
}

impl OllamaClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn chat(&self, model: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            stream: false,
        };

        let url = format!("{}/api/chat", self.endpoint);

        debug!("Sending chat request to: {}", url);

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| HonyakuError::Model(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(HonyakuError::Model(format!(
                "Ollama API error {}: {}", status, error_text
            )));
        }

        let chat_response: ChatResponse = response.json().await
            .map_err(|e| HonyakuError::Model(format!("Failed to parse response: {}", e)))?;

        chat_response
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| HonyakuError::Model("Response carries no message content".to_string()))
    }
}

/// Check if Ollama is reachable and the model is loaded
pub async fn check_availability(endpoint: &str, model: &str) -> Result<()> {
    let client = Client::new();
    let url = format!("{}/api/show", endpoint.trim_end_matches('/'));

    let request = json!({
        "name": model
    });

    let response = client
        .post(&url)
        .json(&request)
        .send()
        .await
        .map_err(|e| HonyakuError::Model(format!("Failed to connect to Ollama: {}", e)))?;

    if response.status().is_success() {
        info!("Ollama model '{}' is available", model);
        Ok(())
    } else {
        Err(HonyakuError::Model(format!(
            "Ollama model '{}' not found. Please pull the model first: ollama pull {}",
            model, model
        )))
    }
}
