//! AI financial advice.
//!
//! This module provides:
//! - A `CompletionProvider` trait for text-completion backends
//! - OpenAI-compatible and Ollama providers over HTTP
//! - Prompt rendering from the caller's financial data
//! - Reply parsing into typed [`FinancialAdvice`]
//!
//! The dashboard entry points that gather data and call a provider live in
//! `actions::advice`.

pub mod ollama;
pub mod openai;
pub mod parse;
pub mod prompt;
pub mod provider;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use parse::{AdviceCategory, FinancialAdvice, Priority, Recommendation, advice_schema, parse_advice};
pub use prompt::{AdviceContext, advice_prompt, question_prompt};
pub use provider::{CompletionProvider, CompletionRequest, ProviderInfo, ResponseSchema};

use crate::config::{AiConfig, ProviderKind};
use crate::error::{Error, Result};

/// Provider selected from configuration.
pub enum AnyProvider {
    OpenAi(OpenAiProvider),
    Ollama(OllamaProvider),
}

impl CompletionProvider for AnyProvider {
    fn info(&self) -> ProviderInfo {
        match self {
            Self::OpenAi(p) => p.info(),
            Self::Ollama(p) => p.info(),
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        match self {
            Self::OpenAi(p) => p.complete(request).await,
            Self::Ollama(p) => p.complete(request).await,
        }
    }
}

/// Create the configured completion provider.
///
/// # Errors
///
/// Returns `Error::Config` when the OpenAI provider is selected without an
/// API key.
pub fn create_provider(config: &AiConfig) -> Result<AnyProvider> {
    match config.provider {
        ProviderKind::OpenAi => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                Error::Config(
                    "OpenAI API key not set (export OPENAI_API_KEY or `fin config set ai.api_key ...`)"
                        .into(),
                )
            })?;
            Ok(AnyProvider::OpenAi(OpenAiProvider::with_config(
                config.endpoint.clone(),
                config.model.clone(),
                api_key,
            )))
        }
        ProviderKind::Ollama => Ok(AnyProvider::Ollama(OllamaProvider::with_config(
            config.endpoint.clone(),
            config.model.clone(),
        ))),
    }
}
