// SPDX-License-Identifier: MIT

//! Workflow graph executor
//!
//! Runs a [`Topology`] end to end: entry node first, then the analyst
//! fan-out, then the risk and decision stages in sequence. Analysts run
//! concurrently on cloned state snapshots and never see each other's
//! output; the executor alone merges their contributions, in registration
//! order, so the final state is independent of completion timing.
//!
//! Failure policy: an analyst failure is soft (recorded as a warning, its
//! signal key absent) because analysts are voluntary opinions. Entry,
//! risk, and terminal failures are fatal since nothing downstream can be
//! stubbed for them.

use futures::future::join_all;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::fund::error::{FundError, NodeFailure};
use crate::fund::node::Node;
use crate::fund::progress::{NodeStatus, ProgressSink, Reporter};
use crate::fund::state::{ChatMessage, FundState};

use super::topology::Topology;

/// Everything a completed run hands back: the final state plus the soft
/// failures collected along the way
#[derive(Debug)]
pub struct ExecutionReport {
    pub state: FundState,
    pub warnings: Vec<NodeFailure>,
}

pub struct Executor {
    progress: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
}

impl Executor {
    pub fn new(progress: Arc<dyn ProgressSink>, cancel: CancellationToken) -> Self {
        Self { progress, cancel }
    }

    /// Run the topology against the initial state
    pub async fn run(
        &self,
        run_id: Uuid,
        topology: &Topology,
        initial: FundState,
    ) -> Result<ExecutionReport, FundError> {
        let reporter = Reporter::new(self.progress.clone(), run_id);

        // Entry output is the base snapshot every analyst starts from
        let base = self.run_stage(&reporter, topology.entry(), initial).await?;

        let analyst_runs = topology.analysts().iter().map(|node| {
            let node = node.clone();
            let snapshot = base.clone();
            let cancel = self.cancel.clone();
            let reporter = reporter.clone();
            async move {
                reporter.update(node.id(), NodeStatus::Running);
                tokio::select! {
                    _ = cancel.cancelled() => None,
                    result = node.run(snapshot) => Some(result),
                }
            }
        });

        // join_all keeps results in registration order regardless of
        // which analyst finishes first
        let outcomes = join_all(analyst_runs).await;

        if self.cancel.is_cancelled() {
            return Err(FundError::Cancelled);
        }

        let mut merged = base.clone();
        let mut warnings = Vec::new();
        for (node, outcome) in topology.analysts().iter().zip(outcomes) {
            match outcome {
                None => return Err(FundError::Cancelled),
                Some(Ok(returned)) => match analyst_contribution(node.id(), &base, returned) {
                    Ok((signal, messages)) => {
                        if let Some(signal) = signal {
                            merged
                                .data
                                .analyst_signals
                                .insert(node.id().to_string(), signal);
                        }
                        merged.messages.extend(messages);
                        reporter.update(node.id(), NodeStatus::Done);
                    }
                    Err(violation) => {
                        log::warn!("analyst {} violated state contract: {}", node.id(), violation);
                        reporter.update(node.id(), NodeStatus::Failed);
                        warnings.push(NodeFailure {
                            node: node.id().to_string(),
                            error: violation,
                        });
                    }
                },
                Some(Err(e)) => {
                    log::warn!("analyst {} failed: {}", node.id(), e);
                    reporter.update(node.id(), NodeStatus::Failed);
                    warnings.push(NodeFailure {
                        node: node.id().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let state = self.run_stage(&reporter, topology.risk(), merged).await?;
        let state = self.run_stage(&reporter, topology.terminal(), state).await?;

        Ok(ExecutionReport { state, warnings })
    }

    /// Run a sequential stage (entry, risk, terminal); failure is fatal
    async fn run_stage(
        &self,
        reporter: &Reporter,
        node: &Arc<dyn Node>,
        state: FundState,
    ) -> Result<FundState, FundError> {
        if self.cancel.is_cancelled() {
            return Err(FundError::Cancelled);
        }

        reporter.update(node.id(), NodeStatus::Running);
        let result = tokio::select! {
            _ = self.cancel.cancelled() => return Err(FundError::Cancelled),
            result = node.run(state) => result,
        };

        match result {
            Ok(next) => {
                reporter.update(node.id(), NodeStatus::Done);
                Ok(next)
            }
            Err(e) => {
                log::error!("node {} failed: {}", node.id(), e);
                reporter.update(node.id(), NodeStatus::Failed);
                Err(FundError::node(node.id(), e))
            }
        }
    }
}

/// Validate an analyst's returned state against the contract and pull out
/// its additions: the signal under its own key and any appended messages.
fn analyst_contribution(
    id: &str,
    base: &FundState,
    returned: FundState,
) -> Result<(Option<serde_json::Value>, Vec<ChatMessage>), String> {
    if returned.data.tickers != base.data.tickers {
        return Err("ticker list changed".to_string());
    }
    if returned.metadata != base.metadata {
        return Err("run metadata changed".to_string());
    }
    for key in base.data.analyst_signals.keys() {
        if !returned.data.analyst_signals.contains_key(key) {
            return Err(format!("signal key '{}' removed", key));
        }
    }
    if returned.messages.len() < base.messages.len()
        || returned.messages[..base.messages.len()] != base.messages[..]
    {
        return Err("conversation prefix rewritten".to_string());
    }

    for key in returned.data.analyst_signals.keys() {
        if key != id && !base.data.analyst_signals.contains_key(key) {
            log::warn!("analyst {} wrote foreign signal key '{}', ignoring", id, key);
        }
    }

    let messages = returned.messages[base.messages.len()..].to_vec();
    let signal = returned.data.analyst_signals.get(id).cloned();
    Ok((signal, messages))
}
