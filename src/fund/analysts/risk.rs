// SPDX-License-Identifier: MIT

//! Position-limit risk controls
//!
//! Runs after the analyst fan-in and before the decision stage. Sizing is
//! deliberately model-free: each ticker gets a fixed fraction of the
//! book's cost-basis value, less whatever exposure is already on.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::fund::error::BoxError;
use crate::fund::node::Node;
use crate::fund::state::{ChatMessage, FundState};

/// Per-ticker cap as a fraction of total portfolio value
const POSITION_LIMIT_PCT: f64 = 0.20;

pub struct RiskManagementNode;

#[async_trait]
impl Node for RiskManagementNode {
    fn id(&self) -> &str {
        "risk_management_agent"
    }

    fn display_name(&self) -> &str {
        "Risk Management"
    }

    async fn run(&self, mut state: FundState) -> Result<FundState, BoxError> {
        let total_value = state.data.portfolio.total_value();
        let limit = POSITION_LIMIT_PCT * total_value;

        let mut controls = serde_json::Map::new();
        for ticker in &state.data.tickers {
            let exposure = state.data.portfolio.exposure(ticker);
            let remaining = (limit - exposure).max(0.0);

            controls.insert(
                ticker.clone(),
                json!({
                    "remaining_position_limit": remaining,
                    "current_exposure": exposure,
                    "reasoning": {
                        "portfolio_value": total_value,
                        "position_limit_pct": POSITION_LIMIT_PCT,
                    }
                }),
            );
        }

        let signal = Value::Object(controls);
        state
            .data
            .analyst_signals
            .insert(self.id().to_string(), signal.clone());
        state.messages.push(ChatMessage::ai(self.id(), signal));

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fund::portfolio::{Portfolio, Position};
    use crate::fund::state::{MarketContext, RunMetadata};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn state_with_book(cash: f64) -> FundState {
        let tickers = vec!["AAPL".to_string(), "MSFT".to_string()];
        FundState {
            messages: vec![],
            data: MarketContext {
                portfolio: Portfolio::new(cash, 0.0, &tickers),
                tickers,
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                analyst_signals: BTreeMap::new(),
            },
            metadata: RunMetadata {
                show_reasoning: false,
                model_name: "test".to_string(),
                model_provider: "Test".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_limits_cover_every_ticker() {
        let state = RiskManagementNode
            .run(state_with_book(10_000.0))
            .await
            .unwrap();

        let signal = &state.data.analyst_signals["risk_management_agent"];
        assert_eq!(signal["AAPL"]["remaining_position_limit"], 2_000.0);
        assert_eq!(signal["MSFT"]["remaining_position_limit"], 2_000.0);
    }

    #[tokio::test]
    async fn test_existing_exposure_reduces_limit() {
        let mut state = state_with_book(10_000.0);
        state.data.portfolio.positions.insert(
            "AAPL".to_string(),
            Position {
                long: 10,
                short: 0,
                long_cost_basis: 150.0,
                short_cost_basis: 0.0,
            },
        );

        let state = RiskManagementNode.run(state).await.unwrap();

        // book value 11_500, limit 2_300, exposure 1_500
        let signal = &state.data.analyst_signals["risk_management_agent"];
        assert_eq!(signal["AAPL"]["current_exposure"], 1_500.0);
        assert_eq!(signal["AAPL"]["remaining_position_limit"], 800.0);
    }

    #[tokio::test]
    async fn test_limit_never_negative() {
        let mut state = state_with_book(0.0);
        state.data.portfolio.positions.insert(
            "AAPL".to_string(),
            Position {
                long: 100,
                short: 0,
                long_cost_basis: 10.0,
                short_cost_basis: 0.0,
            },
        );

        let state = RiskManagementNode.run(state).await.unwrap();

        let signal = &state.data.analyst_signals["risk_management_agent"];
        assert_eq!(signal["AAPL"]["remaining_position_limit"], 0.0);
    }
}
