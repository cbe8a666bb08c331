// SPDX-License-Identifier: MIT

//! Shared run state threaded through the workflow graph
//!
//! One [`FundState`] instance exists per run. The executor owns it; nodes
//! receive a snapshot and hand back a modified copy. Only two parts are
//! writable by nodes: the conversation (append-only) and the analyst
//! signal map (each analyst writes under its own key). Everything else
//! must come back unchanged, and the executor checks that for analysts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::portfolio::Portfolio;

/// Role of a conversation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Human,
    Ai,
}

/// A single conversation entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    /// Node that produced the message, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Message payload. Model APIs may hand back non-string content, so
    /// this is a JSON value rather than a plain string.
    pub content: Value,
}

impl ChatMessage {
    pub fn human(text: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            name: None,
            content: Value::String(text.into()),
        }
    }

    pub fn ai(name: impl Into<String>, content: Value) -> Self {
        Self {
            role: Role::Ai,
            name: Some(name.into()),
            content,
        }
    }

    /// Textual content, if the payload is a string
    pub fn text(&self) -> Option<&str> {
        self.content.as_str()
    }
}

/// Market data and portfolio context. Immutable for the run apart from
/// the analyst signal map, which only grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    pub tickers: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub portfolio: Portfolio,
    /// One opaque signal per analyst that actually ran
    #[serde(default)]
    pub analyst_signals: BTreeMap<String, Value>,
}

/// Run-level settings, immutable for the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub show_reasoning: bool,
    pub model_name: String,
    pub model_provider: String,
}

/// The single state record threaded through the workflow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundState {
    pub messages: Vec<ChatMessage>,
    pub data: MarketContext,
    pub metadata: RunMetadata,
}

impl FundState {
    /// Last conversation entry. After a completed run this is the terminal
    /// node's decision payload.
    pub fn final_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_human_message_is_text() {
        let msg = ChatMessage::human("hello");
        assert_eq!(msg.role, Role::Human);
        assert_eq!(msg.text(), Some("hello"));
    }

    #[test]
    fn test_ai_message_carries_node_name() {
        let msg = ChatMessage::ai("sentiment_analyst", json!({"signal": "bullish"}));
        assert_eq!(msg.name.as_deref(), Some("sentiment_analyst"));
        assert_eq!(msg.text(), None);
    }

    #[test]
    fn test_message_roles_serialize_lowercase() {
        let msg = ChatMessage::human("hi");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "human");
    }
}
