// SPDX-License-Identifier: MIT

//! Typed error handling for alphaflow
//!
//! Fatal conditions are represented by [`FundError`]; decision-payload
//! parse problems are represented by [`ParseDiagnostic`] and are never
//! fatal. Analyst soft failures travel as [`NodeFailure`] warning records
//! on the run outcome instead of as errors.

use thiserror::Error;

/// Error type used at the node and model trait seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error type for a fund run
#[derive(Debug, Error)]
pub enum FundError {
    /// Invalid run configuration: analyst selection, date window, or
    /// portfolio numbers. Raised before any node executes.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A risk or decision node raised during execution. Analyst failures
    /// are soft and never produce this variant.
    #[error("Node '{node}' failed: {source}")]
    NodeExecution {
        node: String,
        #[source]
        source: BoxError,
    },

    /// The run was cancelled before it could complete.
    #[error("Run cancelled")]
    Cancelled,
}

impl FundError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Wrap a node body failure
    pub fn node(node: impl Into<String>, source: BoxError) -> Self {
        Self::NodeExecution {
            node: node.into(),
            source,
        }
    }
}

/// Why the terminal node's payload could not be turned into a decision
/// document. Always paired with a `None` decision, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDiagnostic {
    /// The payload was not text at all
    #[error("invalid decision payload type (expected string, got {actual})")]
    TypeMismatch { actual: &'static str },

    /// The payload was text but not valid JSON; carries a sanitized copy
    /// of the offending text for troubleshooting
    #[error("malformed decision payload: {detail}; payload: {payload:?}")]
    MalformedPayload { detail: String, payload: String },

    /// Anything else that went wrong while parsing
    #[error("unexpected error while parsing decision payload: {detail}")]
    UnknownParseError { detail: String },
}

/// Record of an analyst node that failed during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFailure {
    pub node: String,
    pub error: String,
}
