// SPDX-License-Identifier: MIT

//! Decision payload extraction
//!
//! The terminal node's final conversation entry is free-form model output
//! that should be a JSON document mapping tickers to allocation actions.
//! That text is the one wire contract the engine owns, and model output
//! is untrusted: extraction converts every failure into a
//! [`ParseDiagnostic`] instead of letting it escape to the caller.

use serde_json::Value;

use super::error::ParseDiagnostic;

/// Longest payload snippet carried inside a diagnostic
const MAX_SNIPPET_LEN: usize = 512;

/// Parse the terminal node's payload into the structured decision
/// document. Any valid JSON document is returned as-is.
pub fn extract_decisions(content: &Value) -> Result<Value, ParseDiagnostic> {
    let text = match content {
        Value::String(s) => s,
        other => {
            return Err(ParseDiagnostic::TypeMismatch {
                actual: json_type_name(other),
            })
        }
    };

    match serde_json::from_str::<Value>(text) {
        Ok(document) => Ok(document),
        Err(e) if e.is_io() => Err(ParseDiagnostic::UnknownParseError {
            detail: e.to_string(),
        }),
        Err(e) => Err(ParseDiagnostic::MalformedPayload {
            detail: e.to_string(),
            payload: sanitize(text),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Log-safe copy of the offending text: control characters stripped,
/// length capped at [`MAX_SNIPPET_LEN`] characters
fn sanitize(text: &str) -> String {
    let mut cleaned: String = text
        .chars()
        .filter(|c| !c.is_control() || *c == '\n')
        .take(MAX_SNIPPET_LEN)
        .collect();
    if text.chars().count() > MAX_SNIPPET_LEN {
        cleaned.push_str("...");
    }
    cleaned
}
