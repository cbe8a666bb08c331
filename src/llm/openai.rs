//! OpenAI-compatible chat completions client
//!
//! Also serves Groq, which speaks the same wire format on a different
//! base URL with its own key.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;
use std::error::Error;

use super::{ChatModel, HTTP};

pub struct OpenAIChat {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl OpenAIChat {
    /// Client against api.openai.com. Requires `OPENAI_API_KEY`;
    /// `OPENAI_BASE_URL` overrides the endpoint.
    pub fn new(model_name: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| "OPENAI_API_KEY must be set")?;
        let base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        Ok(Self {
            client: HTTP.clone(),
            api_key,
            model_name: model_name.to_string(),
            base_url,
        })
    }

    /// Client against Groq's OpenAI-compatible endpoint. Requires
    /// `GROQ_API_KEY`.
    pub fn groq(model_name: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let api_key = env::var("GROQ_API_KEY").map_err(|_| "GROQ_API_KEY must be set")?;

        Ok(Self {
            client: HTTP.clone(),
            api_key,
            model_name: model_name.to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
        })
    }
}

#[async_trait]
impl ChatModel for OpenAIChat {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = json!({
            "model": self.model_name,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "temperature": 0.2
        });

        log::debug!("OpenAI request for model {}", self.model_name);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            return Err(format!("OpenAI API error: {}", text).into());
        }

        let resp_json: serde_json::Value = resp.json().await?;
        let content = resp_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or("No content in OpenAI response")?;

        Ok(content.to_string())
    }
}
