//! Run executor: drives one run through its graph until no next node remains.
//!
//! The executor owns the step loop described by the run state machine:
//! resolve the current node, invoke it, apply its routing decision (explicit
//! decision over static edge), advance, and record every transition on the
//! run's log. Faults that happen mid-run never escape as errors; they become
//! the run's terminal `Failed` state.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::engine::error::{EngineError, EngineResult};
use crate::engine::graph::{GraphDefinition, GraphStore};
use crate::engine::node::Decision;
use crate::engine::registry::NodeRegistry;
use crate::engine::run::{RunRecord, RunStatus, RunStore};
use crate::engine::state::StateDoc;

/// Fixed ceiling on node invocations per run. The sole guard against cyclic
/// graphs and runaway routing; deliberately a coarse global count.
pub const MAX_STEPS: usize = 200;

pub struct Executor {
    graphs: Arc<GraphStore>,
    runs: Arc<RunStore>,
    registry: Arc<NodeRegistry>,
    max_steps: usize,
}

impl Executor {
    pub fn new(
        graphs: Arc<GraphStore>,
        runs: Arc<RunStore>,
        registry: Arc<NodeRegistry>,
    ) -> Self {
        Self {
            graphs,
            runs,
            registry,
            max_steps: MAX_STEPS,
        }
    }

    /// Overrides the step budget. Mostly useful in tests.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn registry(&self) -> &Arc<NodeRegistry> {
        &self.registry
    }

    /// Stores a graph definition and returns its id.
    pub fn create_graph(&self, definition: GraphDefinition) -> String {
        self.graphs.create(definition)
    }

    /// Creates a `Pending` run for `graph_id`. Fails with `GraphNotFound`
    /// before any record is created; does not begin execution.
    pub fn start_run(&self, graph_id: &str, initial_state: StateDoc) -> EngineResult<String> {
        if !self.graphs.contains(graph_id) {
            return Err(EngineError::GraphNotFound(graph_id.to_string()));
        }
        Ok(self.runs.create(graph_id, initial_state))
    }

    /// Snapshot of a run record, live or terminal.
    pub fn get_run(&self, run_id: &str) -> EngineResult<RunRecord> {
        self.runs.snapshot(run_id)
    }

    /// Drives the run to completion. Blocking from the caller's point of
    /// view; spawn it to get fire-and-forget behavior.
    ///
    /// `Err` here means the run or its graph could not be resolved at all.
    /// Everything that goes wrong after the run has started lands on the
    /// record (`Failed` status plus a log entry) instead.
    pub async fn execute(&self, run_id: &str) -> EngineResult<()> {
        let entry = self.runs.entry(run_id)?;
        let graph = {
            let record = entry.lock().unwrap();
            self.graphs
                .get(&record.graph_id)
                .ok_or_else(|| EngineError::GraphNotFound(record.graph_id.clone()))?
        };

        let mut current = Some(graph.start_node.clone());
        let mut state = {
            let mut record = entry.lock().unwrap();
            if record.status != RunStatus::Pending {
                // Terminal records are absorbing and a running record is
                // already owned by another executor invocation.
                debug!(run_id, status = ?record.status, "skipping non-pending run");
                return Ok(());
            }
            record.status = RunStatus::Running;
            record.current_node = current.clone();
            let started = format!("Run started for graph {}", record.graph_id);
            record.push_log(started);
            record.state.clone()
        };
        info!(run_id, start_node = %graph.start_node, "run started");

        let mut steps = 0usize;
        while let Some(node_name) = current {
            steps += 1;
            if steps > self.max_steps {
                return self.fail(
                    &entry,
                    state,
                    format!("Step budget of {} exceeded", self.max_steps),
                );
            }

            let Some(node) = self.registry.lookup(&node_name) else {
                return self.fail(&entry, state, format!("Node '{node_name}' is not registered"));
            };

            debug!(run_id, node = %node_name, step = steps, "running node");
            let (next_state, decision) = match node(state, Arc::clone(&self.registry)).await {
                Ok(output) => output,
                Err(err) => {
                    let mut record = entry.lock().unwrap();
                    record.status = RunStatus::Failed;
                    record.current_node = Some(node_name.clone());
                    record.push_log(format!("Node '{node_name}' failed: {err}"));
                    warn!(run_id, node = %node_name, %err, "run failed");
                    return Ok(());
                }
            };
            state = next_state;

            let next = match decision {
                Decision::Explicit(next) => next,
                Decision::UseDefault => graph.edge(&node_name),
            };

            {
                let mut record = entry.lock().unwrap();
                record.state = state.clone();
                record.current_node = next.clone();
                if let Some(next_name) = &next {
                    record.push_log(format!("{node_name} -> {next_name}"));
                }
            }

            current = next;
            // Let other runs make progress between steps.
            tokio::task::yield_now().await;
        }

        let mut record = entry.lock().unwrap();
        record.state = state;
        record.status = RunStatus::Completed;
        record.current_node = None;
        record.push_log("Run completed");
        info!(run_id, steps, "run completed");
        Ok(())
    }

    fn fail(
        &self,
        entry: &Arc<std::sync::Mutex<RunRecord>>,
        state: StateDoc,
        message: String,
    ) -> EngineResult<()> {
        let mut record = entry.lock().unwrap();
        record.state = state;
        record.status = RunStatus::Failed;
        record.push_log(message.clone());
        warn!(run_id = %record.run_id, %message, "run failed");
        Ok(())
    }
}
