// SPDX-License-Identifier: MIT

//! Workflow graph construction
//!
//! The topology depends on which analysts are selected at invocation
//! time, so the builder assembles a fresh [`Topology`] per run instead of
//! keeping a long-lived graph. Selection validation happens here, before
//! any state exists.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use crate::fund::error::{BoxError, FundError};
use crate::fund::node::Node;
use crate::fund::registry::AnalystRegistry;
use crate::fund::state::FundState;

use super::topology::Topology;

/// Entry node: hands the initial state through unchanged
struct StartNode;

#[async_trait]
impl Node for StartNode {
    fn id(&self) -> &str {
        "start_node"
    }

    async fn run(&self, state: FundState) -> Result<FundState, BoxError> {
        Ok(state)
    }
}

/// Builds per-run topologies from the analyst registry. The risk and
/// terminal nodes are fixed at construction and present in every run.
pub struct GraphBuilder {
    registry: AnalystRegistry,
    risk: Arc<dyn Node>,
    terminal: Arc<dyn Node>,
}

impl GraphBuilder {
    pub fn new(registry: AnalystRegistry, risk: Arc<dyn Node>, terminal: Arc<dyn Node>) -> Self {
        Self {
            registry,
            risk,
            terminal,
        }
    }

    /// Assemble the topology for one invocation.
    ///
    /// The selection keeps its iteration order (first occurrence wins on
    /// duplicates). An empty selection or any identifier missing from the
    /// registry fails with a configuration error naming every offender.
    pub fn build(&self, selected: &[String]) -> Result<Topology, FundError> {
        if selected.is_empty() {
            return Err(FundError::configuration(
                "at least one analyst must be selected",
            ));
        }

        let mut seen = HashSet::new();
        let selection: Vec<&str> = selected
            .iter()
            .map(|id| id.as_str())
            .filter(|id| seen.insert(*id))
            .collect();

        let unknown: Vec<&str> = selection
            .iter()
            .filter(|id| !self.registry.contains(id))
            .copied()
            .collect();
        if !unknown.is_empty() {
            return Err(FundError::configuration(format!(
                "unknown analyst identifier(s): {}",
                unknown.join(", ")
            )));
        }

        let analysts: Vec<Arc<dyn Node>> = selection
            .iter()
            .map(|id| {
                self.registry
                    .get(id)
                    .ok_or_else(|| FundError::configuration(format!("unknown analyst: {}", id)))
            })
            .collect::<Result<_, _>>()?;

        log::debug!(
            "built topology with {} analysts: {:?}",
            analysts.len(),
            analysts.iter().map(|n| n.id()).collect::<Vec<_>>()
        );

        Ok(Topology::new(
            Arc::new(StartNode),
            analysts,
            self.risk.clone(),
            self.terminal.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamedStub(&'static str);

    #[async_trait]
    impl Node for NamedStub {
        fn id(&self) -> &str {
            self.0
        }

        async fn run(&self, state: FundState) -> Result<FundState, BoxError> {
            Ok(state)
        }
    }

    fn builder_with(ids: &[&'static str]) -> GraphBuilder {
        let mut registry = AnalystRegistry::new();
        for id in ids {
            registry.register(Arc::new(NamedStub(id)));
        }
        GraphBuilder::new(
            registry,
            Arc::new(NamedStub("risk_management_agent")),
            Arc::new(NamedStub("portfolio_manager")),
        )
    }

    fn selection(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_topology_shape_for_two_analysts() {
        let builder = builder_with(&["ben_graham", "sentiment_analyst"]);
        let topology = builder
            .build(&selection(&["ben_graham", "sentiment_analyst"]))
            .unwrap();

        // entry + 2 analysts + risk + terminal
        assert_eq!(topology.node_count(), 5);
        assert_eq!(
            topology.node_ids(),
            vec![
                "start_node",
                "ben_graham",
                "sentiment_analyst",
                "risk_management_agent",
                "portfolio_manager"
            ]
        );
        // entry->analyst x2, analyst->risk x2, risk->terminal
        assert_eq!(topology.edges().len(), 5);
        assert_eq!(
            topology.predecessors("risk_management_agent"),
            vec!["ben_graham", "sentiment_analyst"]
        );
        assert_eq!(
            topology.predecessors("portfolio_manager"),
            vec!["risk_management_agent"]
        );
    }

    #[test]
    fn test_every_analyst_linked_entry_to_risk() {
        let builder = builder_with(&["a", "b", "c"]);
        let topology = builder.build(&selection(&["a", "b", "c"])).unwrap();

        for analyst in ["a", "b", "c"] {
            assert!(topology
                .edges()
                .contains(&("start_node".to_string(), analyst.to_string())));
            assert!(topology
                .edges()
                .contains(&(analyst.to_string(), "risk_management_agent".to_string())));
        }
        // no analyst-to-analyst edges
        for (from, to) in topology.edges() {
            assert!(!(["a", "b", "c"].contains(&from.as_str())
                && ["a", "b", "c"].contains(&to.as_str())));
        }
    }

    #[test]
    fn test_selection_order_preserved() {
        let builder = builder_with(&["a", "b", "c"]);
        let topology = builder.build(&selection(&["c", "a"])).unwrap();

        let ids: Vec<&str> = topology.analysts().iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_duplicate_selection_first_occurrence_wins() {
        let builder = builder_with(&["a", "b"]);
        let topology = builder.build(&selection(&["b", "a", "b"])).unwrap();

        let ids: Vec<&str> = topology.analysts().iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(topology.node_count(), 5);
    }

    #[test]
    fn test_empty_selection_is_configuration_error() {
        let builder = builder_with(&["a"]);
        let err = builder.build(&[]).unwrap_err();

        assert!(matches!(err, FundError::Configuration(_)));
    }

    #[test]
    fn test_unknown_ids_all_named_in_error() {
        let builder = builder_with(&["a"]);
        let err = builder
            .build(&selection(&["a", "ghost", "phantom"]))
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("ghost"));
        assert!(message.contains("phantom"));
        assert!(!message.contains("a,"));
    }
}
