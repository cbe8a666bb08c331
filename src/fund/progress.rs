// SPDX-License-Identifier: MIT

//! Run lifecycle and per-node progress reporting
//!
//! The executor notifies an external [`ProgressSink`] when a run starts
//! and stops and as each node changes status. Sinks are collaborators
//! outside the engine's control, so every call goes through [`Reporter`],
//! which swallows sink errors: a broken sink must never fail a run.

use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use super::error::BoxError;

/// Status of a single node as seen by the progress sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Running,
    Done,
    Failed,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStatus::Running => write!(f, "running"),
            NodeStatus::Done => write!(f, "done"),
            NodeStatus::Failed => write!(f, "failed"),
        }
    }
}

/// External sink for run lifecycle notifications and node status updates.
///
/// Implementations must be reentrant: several runs may report through the
/// same sink concurrently, distinguished by run id.
pub trait ProgressSink: Send + Sync {
    fn started(&self, run_id: Uuid) -> Result<(), BoxError>;
    fn stopped(&self, run_id: Uuid) -> Result<(), BoxError>;
    fn update(&self, run_id: Uuid, node: &str, status: NodeStatus) -> Result<(), BoxError>;
}

/// Progress sink that reports through the `log` facade
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn started(&self, run_id: Uuid) -> Result<(), BoxError> {
        log::info!("[{}] run started", run_id);
        Ok(())
    }

    fn stopped(&self, run_id: Uuid) -> Result<(), BoxError> {
        log::info!("[{}] run stopped", run_id);
        Ok(())
    }

    fn update(&self, run_id: Uuid, node: &str, status: NodeStatus) -> Result<(), BoxError> {
        log::info!("[{}] {} {}", run_id, node, status);
        Ok(())
    }
}

/// Executor-side wrapper around a sink: forwards notifications and logs
/// sink errors at debug level instead of propagating them.
#[derive(Clone)]
pub(crate) struct Reporter {
    sink: Arc<dyn ProgressSink>,
    run_id: Uuid,
}

impl Reporter {
    pub(crate) fn new(sink: Arc<dyn ProgressSink>, run_id: Uuid) -> Self {
        Self { sink, run_id }
    }

    pub(crate) fn started(&self) {
        if let Err(e) = self.sink.started(self.run_id) {
            log::debug!("progress sink error on start: {}", e);
        }
    }

    pub(crate) fn stopped(&self) {
        if let Err(e) = self.sink.stopped(self.run_id) {
            log::debug!("progress sink error on stop: {}", e);
        }
    }

    pub(crate) fn update(&self, node: &str, status: NodeStatus) {
        if let Err(e) = self.sink.update(self.run_id, node, status) {
            log::debug!("progress sink error for {}: {}", node, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink that fails every call
    struct BrokenSink;

    impl ProgressSink for BrokenSink {
        fn started(&self, _run_id: Uuid) -> Result<(), BoxError> {
            Err("sink offline".into())
        }

        fn stopped(&self, _run_id: Uuid) -> Result<(), BoxError> {
            Err("sink offline".into())
        }

        fn update(&self, _run_id: Uuid, _node: &str, _status: NodeStatus) -> Result<(), BoxError> {
            Err("sink offline".into())
        }
    }

    #[test]
    fn test_reporter_swallows_sink_errors() {
        let reporter = Reporter::new(Arc::new(BrokenSink), Uuid::new_v4());

        // None of these may panic or propagate
        reporter.started();
        reporter.update("some_node", NodeStatus::Running);
        reporter.update("some_node", NodeStatus::Failed);
        reporter.stopped();
    }

    #[test]
    fn test_status_display() {
        assert_eq!(NodeStatus::Running.to_string(), "running");
        assert_eq!(NodeStatus::Done.to_string(), "done");
        assert_eq!(NodeStatus::Failed.to_string(), "failed");
    }
}
