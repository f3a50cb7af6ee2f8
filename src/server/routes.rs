use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{error, info};

use crate::engine::graph::GraphDefinition;
use crate::engine::run::RunRecord;
use crate::engine::state::StateDoc;
use crate::server::AppState;

// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// POST /graph/create — stores the definition as given, no validation
pub async fn create_graph(
    State(state): State<Arc<AppState>>,
    Json(definition): Json<GraphDefinition>,
) -> Json<serde_json::Value> {
    let graph_id = state.executor.create_graph(definition);
    info!(%graph_id, "graph created");
    Json(serde_json::json!({ "graph_id": graph_id }))
}

#[derive(Deserialize)]
pub struct RunRequest {
    pub graph_id: String,
    #[serde(default)]
    pub initial_state: StateDoc,
    /// When true, the run is spawned and the caller polls `/graph/state`.
    #[serde(default)]
    pub background: bool,
}

// POST /graph/run — synchronous by default, fire-and-forget on request
pub async fn run_graph(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RunRequest>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let run_id = state
        .executor
        .start_run(&req.graph_id, req.initial_state)
        .map_err(|err| {
            info!(graph_id = %req.graph_id, %err, "run rejected");
            StatusCode::NOT_FOUND
        })?;

    if req.background {
        let executor = Arc::clone(&state.executor);
        let spawned = run_id.clone();
        tokio::spawn(async move {
            if let Err(err) = executor.execute(&spawned).await {
                error!(run_id = %spawned, %err, "background run aborted");
            }
        });
        return Ok(Json(serde_json::json!({
            "run_id": run_id,
            "status": "running",
        })));
    }

    state
        .executor
        .execute(&run_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let record = state
        .executor
        .get_run(&run_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let body = serde_json::to_value(record).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(body))
}

// GET /graph/state/{run_id} — live snapshot of the run record
pub async fn run_state(
    State(state): State<Arc<AppState>>,
    Path(run_id): Path<String>,
) -> Result<Json<RunRecord>, StatusCode> {
    state
        .executor
        .get_run(&run_id)
        .map(Json)
        .map_err(|_| StatusCode::NOT_FOUND)
}
