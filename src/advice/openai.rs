//! OpenAI-compatible chat completions provider.
//!
//! Talks to any server exposing `/v1/chat/completions` with bearer auth.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

use super::provider::{CompletionProvider, CompletionRequest, ProviderInfo};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI-compatible provider.
pub struct OpenAiProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiProvider {
    /// Create a provider; `None` fields fall back to the public API defaults.
    pub fn with_config(endpoint: Option<String>, model: Option<String>, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl CompletionProvider for OpenAiProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "openai".to_string(),
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.endpoint);

        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            response_format: request.response_schema.as_ref().map(|s| ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: s.name,
                    strict: true,
                    schema: &s.schema,
                },
            }),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("OpenAI request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "OpenAI completion failed ({status}): {error}"
            )));
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("Failed to parse OpenAI response: {e}")))?;

        data.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Generation("No completion returned from OpenAI".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::provider::ResponseSchema;

    #[test]
    fn test_openai_provider_defaults() {
        let provider = OpenAiProvider::with_config(None, None, "sk-test".to_string());
        let info = provider.info();
        assert_eq!(info.name, "openai");
        assert_eq!(info.model, DEFAULT_MODEL);
        assert_eq!(info.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let provider = OpenAiProvider::with_config(
            Some("http://localhost:8080/".to_string()),
            Some("local-model".to_string()),
            String::new(),
        );
        assert_eq!(provider.info().endpoint, "http://localhost:8080");
    }

    #[test]
    fn test_structured_request_body() {
        let schema = ResponseSchema {
            name: "advice",
            schema: serde_json::json!({"type": "object"}),
        };
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: [ChatMessage {
                role: "user",
                content: "hi",
            }],
            response_format: Some(ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: schema.name,
                    strict: true,
                    schema: &schema.schema,
                },
            }),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["response_format"]["type"], "json_schema");
        assert_eq!(json["response_format"]["json_schema"]["strict"], true);
    }

    #[test]
    fn test_text_request_omits_response_format() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: [ChatMessage {
                role: "user",
                content: "hi",
            }],
            response_format: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("response_format").is_none());
    }
}
