//! Completion provider trait.
//!
//! Defines the interface every text-completion backend implements.
//! Uses async methods since all providers are HTTP-based.

use crate::error::Result;
use serde::Serialize;

/// Provider metadata, shown by `fin config show`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
    pub endpoint: String,
}

/// One prompt in, one reply out.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,

    /// When set, the provider is asked for a reply matching this JSON schema.
    pub response_schema: Option<ResponseSchema>,
}

/// A named JSON schema for structured replies.
#[derive(Debug, Clone)]
pub struct ResponseSchema {
    pub name: &'static str,
    pub schema: serde_json::Value,
}

impl CompletionRequest {
    /// Free-form text reply.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
        }
    }

    /// Reply constrained to `schema`.
    pub fn structured(prompt: impl Into<String>, schema: ResponseSchema) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: Some(schema),
        }
    }
}

/// Trait for completion providers.
///
/// Implemented by the OpenAI-compatible and Ollama providers, and by test
/// stubs. A single round trip: no retries, no streaming.
pub trait CompletionProvider: Send + Sync {
    /// Get provider metadata.
    fn info(&self) -> ProviderInfo;

    /// Submit the prompt and return the reply text.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}
