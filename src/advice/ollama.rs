//! Ollama completion provider.
//!
//! Uses a local Ollama server's `/api/generate` endpoint, non-streaming.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

use super::provider::{CompletionProvider, CompletionRequest, ProviderInfo};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Ollama completion provider.
pub struct OllamaProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider with default configuration.
    pub fn new() -> Self {
        Self::with_config(None, None)
    }

    /// Create a new Ollama provider with custom configuration.
    pub fn with_config(endpoint: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Ollama API request for generation.
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a serde_json::Value>,
}

/// Ollama API response for generation.
#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl CompletionProvider for OllamaProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "ollama".to_string(),
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/api/generate", self.endpoint);

        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt: &request.prompt,
            stream: false,
            format: request.response_schema.as_ref().map(|s| &s.schema),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("Ollama request failed: {e}")))?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!("Ollama generation failed: {error}")));
        }

        let data: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("Failed to parse Ollama response: {e}")))?;

        Ok(data.response)
    }
}
