// SPDX-License-Identifier: MIT

//! Known model catalog
//!
//! Ordered list of selectable models plus provider lookup. The lookup is
//! lenient: an uncatalogued model name is not an error, callers label it
//! `Unknown` and the client layer falls back to name-prefix inference.

use std::fmt;

/// Supported model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Anthropic,
    Groq,
    Unknown,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Groq => "Groq",
            Provider::Unknown => "Unknown",
        }
    }

    /// Parse a provider label, case-insensitively. Unrecognized labels
    /// map to `Unknown` rather than failing.
    pub fn parse(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "openai" => Provider::OpenAI,
            "anthropic" => Provider::Anthropic,
            "groq" => Provider::Groq,
            _ => Provider::Unknown,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Catalog entry for a selectable model
#[derive(Debug, Clone, Copy)]
pub struct ModelInfo {
    pub display_name: &'static str,
    pub model_name: &'static str,
    pub provider: Provider,
}

/// Selectable models in display order
pub const MODEL_ORDER: &[ModelInfo] = &[
    ModelInfo {
        display_name: "[anthropic] claude-3.5-haiku",
        model_name: "claude-3-5-haiku-latest",
        provider: Provider::Anthropic,
    },
    ModelInfo {
        display_name: "[anthropic] claude-3.5-sonnet",
        model_name: "claude-3-5-sonnet-latest",
        provider: Provider::Anthropic,
    },
    ModelInfo {
        display_name: "[groq] deepseek-r1-70b",
        model_name: "deepseek-r1-distill-llama-70b",
        provider: Provider::Groq,
    },
    ModelInfo {
        display_name: "[groq] llama-3.3-70b",
        model_name: "llama-3.3-70b-versatile",
        provider: Provider::Groq,
    },
    ModelInfo {
        display_name: "[openai] gpt-4o",
        model_name: "gpt-4o",
        provider: Provider::OpenAI,
    },
    ModelInfo {
        display_name: "[openai] gpt-4o-mini",
        model_name: "gpt-4o-mini",
        provider: Provider::OpenAI,
    },
    ModelInfo {
        display_name: "[openai] o1",
        model_name: "o1",
        provider: Provider::OpenAI,
    },
];

/// Look up catalog info for a model name
pub fn get_model_info(model_name: &str) -> Option<&'static ModelInfo> {
    MODEL_ORDER.iter().find(|m| m.model_name == model_name)
}

/// Best-effort provider inference for models missing from the catalog,
/// keyed off well-known name prefixes
pub fn infer_provider(model_name: &str) -> Provider {
    if model_name.starts_with("gpt") || model_name.starts_with("o1") || model_name.starts_with("o3")
    {
        Provider::OpenAI
    } else if model_name.starts_with("claude") {
        Provider::Anthropic
    } else if model_name.starts_with("llama") || model_name.starts_with("deepseek") {
        Provider::Groq
    } else {
        Provider::Unknown
    }
}
