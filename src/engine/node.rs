//! Node function contract and routing decisions.
//!
//! Every node follows one asynchronous shape: it takes the current state
//! document plus a registry handle, and resolves to the updated document and
//! a routing decision. Synchronous nodes simply resolve immediately.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::engine::error::EngineResult;
use crate::engine::registry::NodeRegistry;
use crate::engine::state::StateDoc;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Routing decision returned by a node invocation.
///
/// An explicit decision always wins over the graph's static edge; this is
/// how a node implements conditional or looping control flow without the
/// topology expressing cycles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Go to the named node, or finish the run when `None`.
    Explicit(Option<String>),
    /// No decision made; the graph's static edge for the current node applies.
    UseDefault,
}

impl Decision {
    /// Explicitly route to `node`.
    pub fn goto(node: impl Into<String>) -> Self {
        Decision::Explicit(Some(node.into()))
    }

    /// Explicitly end the run.
    pub fn finish() -> Self {
        Decision::Explicit(None)
    }
}

/// What one node invocation produces: the updated state and where to go next.
pub type NodeOutput = (StateDoc, Decision);

/// A registrable node function.
pub type NodeFn = Arc<
    dyn Fn(StateDoc, Arc<NodeRegistry>) -> BoxFuture<'static, EngineResult<NodeOutput>>
        + Send
        + Sync,
>;

/// Wraps an async closure or fn into a [`NodeFn`].
pub fn node_fn<F, Fut>(f: F) -> NodeFn
where
    F: Fn(StateDoc, Arc<NodeRegistry>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = EngineResult<NodeOutput>> + Send + 'static,
{
    Arc::new(move |state, registry| Box::pin(f(state, registry)))
}
