//! Run records and the store that tracks them.
//!
//! A run is one execution instance of a graph. Its record is created
//! `Pending`, mutated only by the executor driving it, and remains queryable
//! after it reaches a terminal status. The store itself supports concurrent
//! insertion and lookup across runs; each record is guarded individually so
//! pollers can snapshot a run while it is still moving.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::error::{EngineError, EngineResult};
use crate::engine::state::StateDoc;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    /// Terminal statuses are absorbing; a record never leaves them.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub graph_id: String,
    pub state: StateDoc,
    pub log: Vec<String>,
    pub status: RunStatus,
    pub current_node: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RunRecord {
    fn new(run_id: String, graph_id: String, state: StateDoc) -> Self {
        let now = Utc::now();
        Self {
            run_id,
            graph_id,
            state,
            log: Vec::new(),
            status: RunStatus::Pending,
            current_node: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a trace line. The log is append-only and strictly ordered.
    pub(crate) fn push_log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
        self.updated_at = Utc::now();
    }
}

/// Keyed collection of run records.
#[derive(Default)]
pub struct RunStore {
    runs: RwLock<HashMap<String, Arc<Mutex<RunRecord>>>>,
}

impl RunStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `Pending` record with an empty log and the caller-supplied
    /// initial state. Does not begin execution.
    pub fn create(&self, graph_id: &str, initial_state: StateDoc) -> String {
        let run_id = Uuid::new_v4().to_string();
        let record = RunRecord::new(run_id.clone(), graph_id.to_string(), initial_state);
        self.runs
            .write()
            .unwrap()
            .insert(run_id.clone(), Arc::new(Mutex::new(record)));
        run_id
    }

    /// Live handle for the executor driving the run.
    pub(crate) fn entry(&self, run_id: &str) -> EngineResult<Arc<Mutex<RunRecord>>> {
        self.runs
            .read()
            .unwrap()
            .get(run_id)
            .map(Arc::clone)
            .ok_or_else(|| EngineError::RunNotFound(run_id.to_string()))
    }

    /// Point-in-time copy of a possibly still-running record.
    pub fn snapshot(&self, run_id: &str) -> EngineResult<RunRecord> {
        let entry = self.entry(run_id)?;
        let record = entry.lock().unwrap();
        Ok(record.clone())
    }
}
