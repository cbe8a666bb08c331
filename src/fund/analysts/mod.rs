// SPDX-License-Identifier: MIT

//! Analyst, risk, and decision node bodies
//!
//! The engine treats every node body as an external collaborator behind
//! the [`Node`](crate::fund::node::Node) contract; these are the stock
//! implementations the binary wires up. Signal payloads are opaque to
//! the graph machinery and only interpreted again by the decision stage.

mod manager;
mod persona;
mod risk;

pub use manager::PortfolioManagerNode;
pub use persona::PersonaAnalyst;
pub use risk::RiskManagementNode;

use std::sync::Arc;

use super::registry::AnalystRegistry;

const BEN_GRAHAM_PROMPT: &str = "You are Ben Graham. Hunt for a margin of safety: \
    net-nets, low price relative to tangible book value, conservative balance \
    sheets. Distrust growth stories and pay only for demonstrated earnings power.";

const BILL_ACKMAN_PROMPT: &str = "You are Bill Ackman. Look for high-quality, \
    simple, predictable businesses with pricing power, and take concentrated, \
    high-conviction positions. Be vocal about catalysts that could unlock value.";

const WARREN_BUFFETT_PROMPT: &str = "You are Warren Buffett. Buy wonderful \
    companies at fair prices: durable competitive moats, honest and able \
    management, strong returns on capital. Stay inside your circle of competence.";

const FUNDAMENTALS_PROMPT: &str = "You are a fundamentals analyst. Judge each \
    company on profitability, growth, financial health, and valuation ratios. \
    Flag deteriorating margins or leverage before they show up in the price.";

const SENTIMENT_PROMPT: &str = "You are a market sentiment analyst. Read the \
    crowd: news flow, insider activity, and positioning. Fade euphoria, lean \
    into washed-out pessimism, and say when the tape disagrees with the story.";

const VALUATION_PROMPT: &str = "You are a valuation analyst. Estimate intrinsic \
    value with owner-earnings and DCF-style reasoning, compare it to market \
    price, and signal only when the gap is material in either direction.";

/// Registry of the stock analyst personas, in display order
pub fn default_registry() -> AnalystRegistry {
    let mut registry = AnalystRegistry::new();

    registry.register(Arc::new(PersonaAnalyst::new(
        "ben_graham",
        "Ben Graham",
        BEN_GRAHAM_PROMPT,
    )));
    registry.register(Arc::new(PersonaAnalyst::new(
        "bill_ackman",
        "Bill Ackman",
        BILL_ACKMAN_PROMPT,
    )));
    registry.register(Arc::new(PersonaAnalyst::new(
        "warren_buffett",
        "Warren Buffett",
        WARREN_BUFFETT_PROMPT,
    )));
    registry.register(Arc::new(PersonaAnalyst::new(
        "fundamentals_analyst",
        "Fundamentals Analyst",
        FUNDAMENTALS_PROMPT,
    )));
    registry.register(Arc::new(PersonaAnalyst::new(
        "sentiment_analyst",
        "Sentiment Analyst",
        SENTIMENT_PROMPT,
    )));
    registry.register(Arc::new(PersonaAnalyst::new(
        "valuation_analyst",
        "Valuation Analyst",
        VALUATION_PROMPT,
    )));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_order() {
        let registry = default_registry();
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.ids()[0], "ben_graham");
        assert_eq!(registry.ids()[5], "valuation_analyst");
    }

    #[test]
    fn test_default_registry_display_names() {
        let registry = default_registry();
        let choices = registry.choices();
        assert!(choices
            .iter()
            .any(|(display, id)| display == "Warren Buffett" && id == "warren_buffett"));
    }
}
