// SPDX-License-Identifier: MIT

//! Run orchestration: the crate's invocation surface
//!
//! [`FundRunner::run`] validates the request, builds the per-run
//! topology, executes it with progress reporting wrapped around the whole
//! run, and turns the terminal payload into the structured outcome.

use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::decision::extract_decisions;
use super::error::{FundError, NodeFailure, ParseDiagnostic};
use super::graph::{Executor, GraphBuilder};
use super::portfolio::Portfolio;
use super::progress::{LogProgress, ProgressSink, Reporter};
use super::state::{ChatMessage, FundState, MarketContext, RunMetadata};

/// Everything one invocation needs
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub tickers: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub portfolio: Portfolio,
    pub show_reasoning: bool,
    pub selected_analysts: Vec<String>,
    pub model_name: String,
    pub model_provider: String,
}

/// Result object handed back to the caller. `decisions` is `None` when
/// the terminal payload did not parse; the diagnostic says why.
#[derive(Debug)]
pub struct RunOutcome {
    pub decisions: Option<Value>,
    pub decision_diagnostic: Option<ParseDiagnostic>,
    pub analyst_signals: BTreeMap<String, Value>,
    pub warnings: Vec<NodeFailure>,
}

pub struct FundRunner {
    builder: GraphBuilder,
    progress: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
}

impl FundRunner {
    pub fn new(builder: GraphBuilder) -> Self {
        Self {
            builder,
            progress: Arc::new(LogProgress),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Token that cancels any run in progress on this runner
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Execute one invocation end to end
    pub async fn run(&self, request: RunRequest) -> Result<RunOutcome, FundError> {
        // All validation happens before any side effect
        if request.start_date > request.end_date {
            return Err(FundError::configuration(format!(
                "start date {} is after end date {}",
                request.start_date, request.end_date
            )));
        }
        request.portfolio.validate()?;
        let topology = self.builder.build(&request.selected_analysts)?;

        let run_id = Uuid::new_v4();
        let reporter = Reporter::new(self.progress.clone(), run_id);
        reporter.started();

        let result = Executor::new(self.progress.clone(), self.cancel.clone())
            .run(run_id, &topology, initial_state(request))
            .await;

        // The sink is released on success, fatal failure, and cancellation
        reporter.stopped();
        let report = result?;

        let (decisions, decision_diagnostic) = match report.state.final_message() {
            Some(message) => match extract_decisions(&message.content) {
                Ok(document) => (Some(document), None),
                Err(diagnostic) => {
                    log::error!("decision payload rejected: {}", diagnostic);
                    (None, Some(diagnostic))
                }
            },
            None => (None, None),
        };

        Ok(RunOutcome {
            decisions,
            decision_diagnostic,
            analyst_signals: report.state.data.analyst_signals,
            warnings: report.warnings,
        })
    }
}

fn initial_state(request: RunRequest) -> FundState {
    FundState {
        messages: vec![ChatMessage::human(
            "Make trading decisions based on the provided data.",
        )],
        data: MarketContext {
            tickers: request.tickers,
            start_date: request.start_date,
            end_date: request.end_date,
            portfolio: request.portfolio,
            analyst_signals: BTreeMap::new(),
        },
        metadata: RunMetadata {
            show_reasoning: request.show_reasoning,
            model_name: request.model_name,
            model_provider: request.model_provider,
        },
    }
}
