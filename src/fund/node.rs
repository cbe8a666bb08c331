// SPDX-License-Identifier: MIT

//! Node contract for workflow graph participants

use async_trait::async_trait;

use super::error::BoxError;
use super::state::FundState;

/// A unit of work in the workflow graph.
///
/// Nodes take the run state and return a modified copy. A node may add an
/// entry under its own key in the analyst signal map and append
/// conversation messages; the ticker list and run metadata must come back
/// untouched. Network calls and progress reporting are fine, but a node
/// never mutates state shared with a sibling.
#[async_trait]
pub trait Node: Send + Sync {
    /// Stable identifier, used for signal keys, edges, and progress updates
    fn id(&self) -> &str;

    /// Human-readable name for selection menus and logs
    fn display_name(&self) -> &str {
        self.id()
    }

    /// Transform the run state
    async fn run(&self, state: FundState) -> Result<FundState, BoxError>;
}

impl std::fmt::Debug for dyn Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node").field("id", &self.id()).finish()
    }
}
