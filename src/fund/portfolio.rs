// SPDX-License-Identifier: MIT

//! Portfolio snapshot types
//!
//! The portfolio is part of the run's market context: read by every node,
//! never modified during a run. Share counts are unsigned by construction;
//! the remaining numeric invariants are checked by [`Portfolio::validate`]
//! before a run starts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::FundError;

/// Open position in a single instrument
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Number of shares held long
    pub long: u64,
    /// Number of shares sold short
    pub short: u64,
    /// Average cost basis for long positions
    pub long_cost_basis: f64,
    /// Average price at which shares were sold short
    pub short_cost_basis: f64,
}

/// Realized gains per instrument, split by side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RealizedGains {
    pub long: f64,
    pub short: f64,
}

/// Snapshot of the book a run trades against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Cash balance; may go negative when margin is in use
    pub cash: f64,
    #[serde(default)]
    pub margin_requirement: f64,
    #[serde(default)]
    pub positions: BTreeMap<String, Position>,
    #[serde(default)]
    pub realized_gains: BTreeMap<String, RealizedGains>,
}

impl Portfolio {
    /// Fresh book: the given cash, zero positions and realized gains for
    /// every ticker
    pub fn new(cash: f64, margin_requirement: f64, tickers: &[String]) -> Self {
        let positions = tickers
            .iter()
            .map(|t| (t.clone(), Position::default()))
            .collect();
        let realized_gains = tickers
            .iter()
            .map(|t| (t.clone(), RealizedGains::default()))
            .collect();

        Self {
            cash,
            margin_requirement,
            positions,
            realized_gains,
        }
    }

    /// Cost-basis gross exposure for one ticker. The engine carries no
    /// market data, so cost basis stands in for price.
    pub fn exposure(&self, ticker: &str) -> f64 {
        match self.positions.get(ticker) {
            Some(p) => p.long as f64 * p.long_cost_basis + p.short as f64 * p.short_cost_basis,
            None => 0.0,
        }
    }

    /// Cash plus cost-basis value of long holdings
    pub fn total_value(&self) -> f64 {
        let longs: f64 = self
            .positions
            .values()
            .map(|p| p.long as f64 * p.long_cost_basis)
            .sum();
        self.cash + longs
    }

    /// Check the numeric invariants: cost bases and margin requirement
    /// must be non-negative. Cash is unconstrained.
    pub fn validate(&self) -> Result<(), FundError> {
        if self.margin_requirement < 0.0 {
            return Err(FundError::configuration(format!(
                "margin requirement must be non-negative, got {}",
                self.margin_requirement
            )));
        }
        for (ticker, position) in &self.positions {
            if position.long_cost_basis < 0.0 || position.short_cost_basis < 0.0 {
                return Err(FundError::configuration(format!(
                    "negative cost basis for {}",
                    ticker
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tickers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_builds_zeroed_entries() {
        let portfolio = Portfolio::new(10_000.0, 0.0, &tickers(&["AAPL", "MSFT"]));

        assert_eq!(portfolio.cash, 10_000.0);
        assert_eq!(portfolio.positions.len(), 2);
        assert_eq!(portfolio.positions["AAPL"], Position::default());
        assert_eq!(portfolio.realized_gains["MSFT"], RealizedGains::default());
    }

    #[test]
    fn test_total_value_uses_long_cost_basis() {
        let mut portfolio = Portfolio::new(1_000.0, 0.0, &tickers(&["AAPL"]));
        portfolio.positions.insert(
            "AAPL".to_string(),
            Position {
                long: 10,
                short: 0,
                long_cost_basis: 50.0,
                short_cost_basis: 0.0,
            },
        );

        assert_eq!(portfolio.total_value(), 1_500.0);
    }

    #[test]
    fn test_exposure_counts_both_sides() {
        let mut portfolio = Portfolio::new(0.0, 0.0, &tickers(&["MSFT"]));
        portfolio.positions.insert(
            "MSFT".to_string(),
            Position {
                long: 2,
                short: 3,
                long_cost_basis: 100.0,
                short_cost_basis: 10.0,
            },
        );

        assert_eq!(portfolio.exposure("MSFT"), 230.0);
        assert_eq!(portfolio.exposure("UNKNOWN"), 0.0);
    }

    #[test]
    fn test_validate_rejects_negative_cost_basis() {
        let mut portfolio = Portfolio::new(0.0, 0.0, &tickers(&["AAPL"]));
        portfolio
            .positions
            .get_mut("AAPL")
            .unwrap()
            .long_cost_basis = -1.0;

        let err = portfolio.validate().unwrap_err();
        assert!(err.to_string().contains("AAPL"));
    }

    #[test]
    fn test_validate_allows_negative_cash() {
        let portfolio = Portfolio::new(-500.0, 0.0, &tickers(&["AAPL"]));
        assert!(portfolio.validate().is_ok());
    }
}
