// SPDX-License-Identifier: MIT

//! LLM persona analyst node
//!
//! All selectable analysts share one node body: a system prompt carrying
//! the persona's investment style, a briefing assembled from the run
//! state, and one model call. The resulting signal is opaque to the
//! engine; only the own-key write and the appended message are contract.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::fund::error::BoxError;
use crate::fund::node::Node;
use crate::fund::state::{ChatMessage, FundState};
use crate::llm;

pub struct PersonaAnalyst {
    id: &'static str,
    display: &'static str,
    system_prompt: &'static str,
}

impl PersonaAnalyst {
    pub fn new(id: &'static str, display: &'static str, system_prompt: &'static str) -> Self {
        Self {
            id,
            display,
            system_prompt,
        }
    }
}

#[async_trait]
impl Node for PersonaAnalyst {
    fn id(&self) -> &str {
        self.id
    }

    fn display_name(&self) -> &str {
        self.display
    }

    async fn run(&self, mut state: FundState) -> Result<FundState, BoxError> {
        let client = llm::client_for(&state.metadata.model_name, &state.metadata.model_provider)?;
        let briefing = briefing(&state);

        let text = client.complete(self.system_prompt, &briefing).await?;
        if state.metadata.show_reasoning {
            log::info!("{} reasoning: {}", self.display, text);
        }

        let signal = parse_signal(&text);
        state
            .data
            .analyst_signals
            .insert(self.id.to_string(), signal.clone());
        state.messages.push(ChatMessage::ai(self.id, signal));

        Ok(state)
    }
}

/// Briefing shared by all personas: the instruments, the analysis
/// window, the current book, and the expected response shape
fn briefing(state: &FundState) -> String {
    let portfolio =
        serde_json::to_string(&state.data.portfolio).unwrap_or_else(|_| "{}".to_string());

    format!(
        "Tickers under consideration: {}\n\
         Analysis window: {} to {}\n\
         Current portfolio: {}\n\n\
         For each ticker, give your opinion in your own investment style. \
         Respond ONLY with a JSON object mapping each ticker to \
         {{\"signal\": \"bullish\" | \"bearish\" | \"neutral\", \
         \"confidence\": <0-100>, \"reasoning\": \"<one paragraph>\"}}.",
        state.data.tickers.join(", "),
        state.data.start_date,
        state.data.end_date,
        portfolio,
    )
}

/// Model output is preferred as JSON; anything else is wrapped as a
/// neutral signal carrying the raw text
fn parse_signal(text: &str) -> Value {
    let trimmed = strip_code_fence(text);
    serde_json::from_str(trimmed).unwrap_or_else(|_| json!({"signal": "neutral", "raw": trimmed}))
}

/// Models often wrap JSON in a markdown code fence; peel it off
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_signal_json_passthrough() {
        let signal = parse_signal(r#"{"AAPL": {"signal": "bullish", "confidence": 80}}"#);
        assert_eq!(signal["AAPL"]["signal"], "bullish");
    }

    #[test]
    fn test_parse_signal_wraps_plain_text() {
        let signal = parse_signal("I like this stock");
        assert_eq!(signal["signal"], "neutral");
        assert_eq!(signal["raw"], "I like this stock");
    }
}
