//! Anthropic messages API client

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;
use std::error::Error;

use super::{ChatModel, HTTP};

pub struct AnthropicChat {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl AnthropicChat {
    /// Requires `ANTHROPIC_API_KEY`; `ANTHROPIC_BASE_URL` overrides the
    /// endpoint.
    pub fn new(model_name: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let api_key = env::var("ANTHROPIC_API_KEY").map_err(|_| "ANTHROPIC_API_KEY must be set")?;
        let base_url = env::var("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com/v1".to_string());

        Ok(Self {
            client: HTTP.clone(),
            api_key,
            model_name: model_name.to_string(),
            base_url,
        })
    }
}

#[async_trait]
impl ChatModel for AnthropicChat {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let url = format!("{}/messages", self.base_url);

        let body = json!({
            "model": self.model_name,
            "max_tokens": 4096,
            "system": system,
            "messages": [
                {"role": "user", "content": user}
            ]
        });

        log::debug!("Anthropic request for model {}", self.model_name);

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(format!("Anthropic API error: {}", text).into());
        }

        let resp_json: serde_json::Value = resp.json().await?;
        let content = resp_json["content"]
            .as_array()
            .and_then(|blocks| {
                blocks
                    .iter()
                    .find(|b| b["type"] == "text")
                    .and_then(|b| b["text"].as_str())
            })
            .ok_or("No text content in Anthropic response")?;

        Ok(content.to_string())
    }
}
