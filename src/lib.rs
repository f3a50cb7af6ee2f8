//! Flowrun
//!
//! A graph run engine: user-defined directed graphs of named nodes executed
//! against a shared mutable state document, with routing driven first by each
//! node's explicit decision and falling back to the graph's static edges.
//!
//! ## Model
//!
//! - **Registry**: flat name-to-function mapping, built once at startup and
//!   shared read-only across runs.
//! - **Graph**: declared node names, a default edge per node, and a start
//!   node. Never validated structurally; a fixed step budget defends the
//!   engine against cycles at runtime.
//! - **Run**: one execution instance with its own state document, ordered
//!   trace log, status, and current node, queryable while it moves and
//!   forever after it terminates.
//!
//! # Example
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use flowrun::engine::executor::Executor;
//! use flowrun::engine::graph::{GraphDefinition, GraphStore};
//! use flowrun::engine::node::Decision;
//! use flowrun::engine::registry::NodeRegistry;
//! use flowrun::engine::run::RunStore;
//! use flowrun::engine::state::StateDoc;
//! use serde_json::json;
//!
//! # async fn run() -> flowrun::engine::error::EngineResult<()> {
//! let mut registry = NodeRegistry::new();
//! registry.register_fn("greet", |mut state: StateDoc, _registry| async move {
//!     state.set("greeting", json!("hello"));
//!     Ok((state, Decision::finish()))
//! });
//!
//! let executor = Executor::new(
//!     Arc::new(GraphStore::new()),
//!     Arc::new(RunStore::new()),
//!     Arc::new(registry),
//! );
//!
//! let graph_id = executor.create_graph(GraphDefinition::new(
//!     vec!["greet".to_string()],
//!     HashMap::new(),
//!     "greet",
//! ));
//! let run_id = executor.start_run(&graph_id, StateDoc::new())?;
//! executor.execute(&run_id).await?;
//!
//! let record = executor.get_run(&run_id)?;
//! assert_eq!(record.state.get_str("greeting"), Some("hello"));
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod nodes;
pub mod server;

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::engine::error::{EngineError, EngineResult};
    pub use crate::engine::executor::{Executor, MAX_STEPS};
    pub use crate::engine::graph::{GraphDefinition, GraphStore};
    pub use crate::engine::node::{node_fn, Decision, NodeFn, NodeOutput};
    pub use crate::engine::registry::NodeRegistry;
    pub use crate::engine::run::{RunRecord, RunStatus, RunStore};
    pub use crate::engine::state::StateDoc;
}
