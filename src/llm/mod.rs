// SPDX-License-Identifier: MIT

//! LLM client layer
//!
//! A slim chat-completion interface over the provider HTTP APIs:
//! - [catalog] - known models and provider lookup
//! - [openai] - OpenAI and OpenAI-compatible endpoints (Groq)
//! - [anthropic] - Anthropic's messages API

pub mod anthropic;
pub mod catalog;
pub mod openai;

pub use catalog::{get_model_info, infer_provider, ModelInfo, Provider, MODEL_ORDER};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use std::error::Error;
use std::sync::Arc;

/// Connection pool shared by every provider client
pub(crate) static HTTP: Lazy<Client> = Lazy::new(Client::new);

/// Single-turn chat completion interface every provider client implements
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn model_name(&self) -> &str;

    async fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>>;
}

impl std::fmt::Debug for dyn ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatModel")
            .field("model", &self.model_name())
            .finish()
    }
}

/// Build a client for the model named in the run metadata.
///
/// An `Unknown` provider label is not immediately fatal: the run was
/// allowed to proceed with an uncatalogued model, so resolution falls
/// back to name-prefix inference and only fails if that comes up empty
/// too.
pub fn client_for(
    model_name: &str,
    provider_label: &str,
) -> Result<Arc<dyn ChatModel>, Box<dyn Error + Send + Sync>> {
    let provider = match Provider::parse(provider_label) {
        Provider::Unknown => infer_provider(model_name),
        known => known,
    };

    match provider {
        Provider::OpenAI => Ok(Arc::new(openai::OpenAIChat::new(model_name)?)),
        Provider::Anthropic => Ok(Arc::new(anthropic::AnthropicChat::new(model_name)?)),
        Provider::Groq => Ok(Arc::new(openai::OpenAIChat::groq(model_name)?)),
        Provider::Unknown => {
            Err(format!("cannot resolve a provider for model '{}'", model_name).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_for_unresolvable_model_fails() {
        let err = client_for("mystery-model", "Unknown").unwrap_err();
        assert!(err.to_string().contains("mystery-model"));
    }
}
