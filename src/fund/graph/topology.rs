// SPDX-License-Identifier: MIT

//! Immutable per-run workflow topology
//!
//! A [`Topology`] is built fresh for every invocation from the current
//! analyst selection and discarded when the run completes. Shape is
//! fixed: one entry node fanning out to the selected analysts, all
//! analysts converging on the risk node, and a single edge from risk to
//! the terminal decision node.

use std::sync::Arc;

use crate::fund::node::Node;

/// The concrete graph built for one invocation
#[derive(Debug)]
pub struct Topology {
    entry: Arc<dyn Node>,
    analysts: Vec<Arc<dyn Node>>,
    risk: Arc<dyn Node>,
    terminal: Arc<dyn Node>,
    edges: Vec<(String, String)>,
}

impl Topology {
    pub(crate) fn new(
        entry: Arc<dyn Node>,
        analysts: Vec<Arc<dyn Node>>,
        risk: Arc<dyn Node>,
        terminal: Arc<dyn Node>,
    ) -> Self {
        let mut edges = Vec::with_capacity(analysts.len() * 2 + 1);
        for analyst in &analysts {
            edges.push((entry.id().to_string(), analyst.id().to_string()));
        }
        for analyst in &analysts {
            edges.push((analyst.id().to_string(), risk.id().to_string()));
        }
        edges.push((risk.id().to_string(), terminal.id().to_string()));

        Self {
            entry,
            analysts,
            risk,
            terminal,
            edges,
        }
    }

    pub fn entry(&self) -> &Arc<dyn Node> {
        &self.entry
    }

    /// Analyst nodes in registration order
    pub fn analysts(&self) -> &[Arc<dyn Node>] {
        &self.analysts
    }

    pub fn risk(&self) -> &Arc<dyn Node> {
        &self.risk
    }

    pub fn terminal(&self) -> &Arc<dyn Node> {
        &self.terminal
    }

    /// All node ids: entry, analysts in order, risk, terminal
    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids = Vec::with_capacity(self.node_count());
        ids.push(self.entry.id());
        ids.extend(self.analysts.iter().map(|n| n.id()));
        ids.push(self.risk.id());
        ids.push(self.terminal.id());
        ids
    }

    pub fn node_count(&self) -> usize {
        self.analysts.len() + 3
    }

    /// Directed edges as (from, to) id pairs
    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    /// Ids of nodes with an edge into `id`
    pub fn predecessors(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(_, to)| to == id)
            .map(|(from, _)| from.as_str())
            .collect()
    }
}
