//! Process-wide node registry.
//!
//! One flat name-to-function mapping, built once at startup and then shared
//! read-only across every concurrent run. There is no unregistration and no
//! namespacing; registering a name twice silently replaces the earlier
//! binding.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::engine::error::EngineResult;
use crate::engine::node::{node_fn, NodeFn, NodeOutput};
use crate::engine::state::StateDoc;

#[derive(Default)]
pub struct NodeRegistry {
    nodes: HashMap<String, NodeFn>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `node`. Last registration wins.
    pub fn register(&mut self, name: impl Into<String>, node: NodeFn) {
        self.nodes.insert(name.into(), node);
    }

    /// Convenience wrapper around [`register`](Self::register) for async
    /// closures and fns.
    pub fn register_fn<F, Fut>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(StateDoc, Arc<NodeRegistry>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = EngineResult<NodeOutput>> + Send + 'static,
    {
        self.register(name, node_fn(f));
    }

    /// Pure read; absence is signalled, never an error.
    pub fn lookup(&self, name: &str) -> Option<NodeFn> {
        self.nodes.get(name).map(Arc::clone)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
