// SPDX-License-Identifier: MIT

//! Analyst registry
//!
//! Ordered mapping of selectable analysts. Registration order is
//! preserved because it drives both the selection menu and the
//! deterministic merge order in the executor.

use std::collections::HashMap;
use std::sync::Arc;

use super::node::Node;

#[derive(Clone, Default)]
pub struct AnalystRegistry {
    order: Vec<String>,
    nodes: HashMap<String, Arc<dyn Node>>,
}

impl AnalystRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an analyst under its node id. Re-registering an id
    /// replaces the node but keeps its original position.
    pub fn register(&mut self, node: Arc<dyn Node>) {
        let id = node.id().to_string();
        if !self.nodes.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.nodes.insert(id, node);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Node>> {
        self.nodes.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Analyst ids in registration order
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// (display name, id) pairs in registration order, for selection UIs
    pub fn choices(&self) -> Vec<(String, String)> {
        self.order
            .iter()
            .map(|id| (self.nodes[id].display_name().to_string(), id.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fund::error::BoxError;
    use crate::fund::state::FundState;
    use async_trait::async_trait;

    struct StubAnalyst {
        id: &'static str,
        display: &'static str,
    }

    #[async_trait]
    impl Node for StubAnalyst {
        fn id(&self) -> &str {
            self.id
        }

        fn display_name(&self) -> &str {
            self.display
        }

        async fn run(&self, state: FundState) -> Result<FundState, BoxError> {
            Ok(state)
        }
    }

    fn stub(id: &'static str, display: &'static str) -> Arc<dyn Node> {
        Arc::new(StubAnalyst { id, display })
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut registry = AnalystRegistry::new();
        registry.register(stub("valuation_analyst", "Valuation Analyst"));
        registry.register(stub("ben_graham", "Ben Graham"));
        registry.register(stub("sentiment_analyst", "Sentiment Analyst"));

        assert_eq!(
            registry.ids(),
            &["valuation_analyst", "ben_graham", "sentiment_analyst"]
        );
    }

    #[test]
    fn test_reregistration_keeps_position() {
        let mut registry = AnalystRegistry::new();
        registry.register(stub("a", "A"));
        registry.register(stub("b", "B"));
        registry.register(stub("a", "A v2"));

        assert_eq!(registry.ids(), &["a", "b"]);
        assert_eq!(registry.get("a").unwrap().display_name(), "A v2");
    }

    #[test]
    fn test_choices_pair_display_with_id() {
        let mut registry = AnalystRegistry::new();
        registry.register(stub("ben_graham", "Ben Graham"));

        assert_eq!(
            registry.choices(),
            vec![("Ben Graham".to_string(), "ben_graham".to_string())]
        );
    }

    #[test]
    fn test_lookup_missing_id() {
        let registry = AnalystRegistry::new();
        assert!(registry.get("nope").is_none());
        assert!(!registry.contains("nope"));
        assert!(registry.is_empty());
    }
}
