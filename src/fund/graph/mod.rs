// SPDX-License-Identifier: MIT

//! Workflow graph construction and execution

pub mod builder;
pub mod executor;
pub mod topology;

pub use builder::GraphBuilder;
pub use executor::{ExecutionReport, Executor};
pub use topology::Topology;
