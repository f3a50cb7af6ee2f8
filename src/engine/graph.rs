//! Graph definitions and the store that holds them.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable description of a graph: the declared node names, the default
/// edge for each node, and the node execution begins at.
///
/// The declared `nodes` list is informational; nothing checks it against the
/// registry at creation time. A start node that turns out to be unregistered
/// is a runtime fault on the run, not a creation error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphDefinition {
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: HashMap<String, Option<String>>,
    pub start_node: String,
}

impl GraphDefinition {
    pub fn new(
        nodes: Vec<String>,
        edges: HashMap<String, Option<String>>,
        start_node: impl Into<String>,
    ) -> Self {
        Self {
            nodes,
            edges,
            start_node: start_node.into(),
        }
    }

    /// Default successor for `node`, when the edge map names one.
    pub fn edge(&self, node: &str) -> Option<String> {
        self.edges.get(node).and_then(Clone::clone)
    }
}

/// Keyed collection of graph definitions. Creation and lookup only; there is
/// no update or delete.
#[derive(Default)]
pub struct GraphStore {
    graphs: RwLock<HashMap<String, GraphDefinition>>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the definition as-is and returns a fresh unique id. No
    /// structural validation is performed.
    pub fn create(&self, definition: GraphDefinition) -> String {
        let graph_id = Uuid::new_v4().to_string();
        self.graphs
            .write()
            .unwrap()
            .insert(graph_id.clone(), definition);
        graph_id
    }

    pub fn get(&self, graph_id: &str) -> Option<GraphDefinition> {
        self.graphs.read().unwrap().get(graph_id).cloned()
    }

    pub fn contains(&self, graph_id: &str) -> bool {
        self.graphs.read().unwrap().contains_key(graph_id)
    }
}
