//! HTTP surface over the run engine.
//!
//! Thin transport layer: it validates nothing beyond payload shape and maps
//! engine lookups to status codes. Execution semantics live entirely in
//! [`crate::engine`].

mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::engine::executor::Executor;

/// Shared handler state.
pub struct AppState {
    pub executor: Arc<Executor>,
}

/// Builds the application router.
pub fn router(executor: Arc<Executor>) -> Router {
    let state = Arc::new(AppState { executor });
    Router::new()
        .route("/health", get(routes::health))
        .route("/graph/create", post(routes::create_graph))
        .route("/graph/run", post(routes::run_graph))
        .route("/graph/state/{run_id}", get(routes::run_state))
        .with_state(state)
}
