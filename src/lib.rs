// SPDX-License-Identifier: MIT

//! alphaflow - workflow-graph orchestration for a multi-analyst trading desk
//!
//! A run fans one shared state record out to a caller-selected set of
//! analyst nodes, merges their opinion signals deterministically, passes
//! the result through a risk-control stage, and ends in a decision node
//! whose textual output is parsed into structured allocation actions.
//!
//! - [`fund::graph`] - per-run topology construction and execution
//! - [`fund::state`] - the shared state threaded through every node
//! - [`fund::decision`] - terminal payload extraction
//! - [`fund::run`] - the invocation surface
//! - [`llm`] - model catalog and provider clients used by the node bodies

pub mod fund;
pub mod llm;
