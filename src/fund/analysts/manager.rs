// SPDX-License-Identifier: MIT

//! Final allocation decision node
//!
//! Consumes the merged analyst signals and the risk controls and asks the
//! model for one allocation action per ticker. The raw model text is
//! appended to the conversation as the terminal payload; downstream
//! extraction owns turning it into structured data.

use async_trait::async_trait;
use serde_json::Value;

use crate::fund::error::BoxError;
use crate::fund::node::Node;
use crate::fund::state::{ChatMessage, FundState};
use crate::llm;

use super::persona::strip_code_fence;

const SYSTEM_PROMPT: &str = "You are a portfolio manager making final trading decisions. \
    Weigh the analyst signals against the risk controls and the current book. \
    Respond ONLY with a JSON object mapping each ticker to \
    {\"action\": \"buy\" | \"sell\" | \"short\" | \"cover\" | \"hold\", \
    \"quantity\": <integer shares>, \"confidence\": <0-100>, \
    \"reasoning\": \"<one sentence>\"}. No prose outside the JSON.";

pub struct PortfolioManagerNode;

#[async_trait]
impl Node for PortfolioManagerNode {
    fn id(&self) -> &str {
        "portfolio_manager"
    }

    fn display_name(&self) -> &str {
        "Portfolio Manager"
    }

    async fn run(&self, mut state: FundState) -> Result<FundState, BoxError> {
        let client = llm::client_for(&state.metadata.model_name, &state.metadata.model_provider)?;

        let signals = serde_json::to_string_pretty(&state.data.analyst_signals)
            .unwrap_or_else(|_| "{}".to_string());
        let portfolio =
            serde_json::to_string(&state.data.portfolio).unwrap_or_else(|_| "{}".to_string());

        let briefing = format!(
            "Tickers: {}\n\nAnalyst signals (including risk controls under \
             \"risk_management_agent\"):\n{}\n\nCurrent portfolio: {}",
            state.data.tickers.join(", "),
            signals,
            portfolio,
        );

        let text = client.complete(SYSTEM_PROMPT, &briefing).await?;
        if state.metadata.show_reasoning {
            log::info!("portfolio manager output: {}", text);
        }

        // The terminal payload stays textual; the extractor owns parsing
        let payload = strip_code_fence(&text).to_string();
        state
            .messages
            .push(ChatMessage::ai(self.id(), Value::String(payload)));

        Ok(state)
    }
}
