//! The run engine core: node registry, graph/run stores, and the executor.

pub mod error;
pub mod executor;
pub mod graph;
pub mod node;
pub mod registry;
pub mod run;
pub mod state;
