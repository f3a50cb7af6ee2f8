//! Error types for the run engine.
//!
//! Only lookup-boundary failures surface as `Err` to callers. Faults that
//! happen while a run is executing (unresolved node, step budget, node
//! errors) are recorded on the `RunRecord` instead and observed by polling.

use thiserror::Error;

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// No graph definition stored under this id.
    #[error("graph '{0}' not found")]
    GraphNotFound(String),

    /// No run record stored under this id.
    #[error("run '{0}' not found")]
    RunNotFound(String),

    /// A node function reported a failure while executing.
    #[error("node '{node}' failed: {message}")]
    ExecutionError { node: String, message: String },
}

impl EngineError {
    pub fn execution(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExecutionError {
            node: node.into(),
            message: message.into(),
        }
    }

    /// True for errors that map to a missing-resource response at the edge.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::GraphNotFound(_) | Self::RunNotFound(_))
    }
}
