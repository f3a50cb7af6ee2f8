use std::time::Duration;

use crate::helpers::engine::{graph, harness};
use flowrun::prelude::*;
use serde_json::json;

#[tokio::test]
async fn unknown_graph_is_rejected_before_any_record_exists() {
    let h = harness(NodeRegistry::new());
    match h.executor.start_run("no-such-graph", StateDoc::new()) {
        Err(EngineError::GraphNotFound(id)) => assert_eq!(id, "no-such-graph"),
        other => panic!("expected GraphNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn run_stays_pending_until_executed() {
    let mut registry = NodeRegistry::new();
    registry.register_fn("only", |state, _registry| async move {
        Ok((state, Decision::finish()))
    });

    let h = harness(registry);
    let graph_id = h.graphs.create(graph(&["only"], &[], "only"));
    let mut initial = StateDoc::new();
    initial.set("seed", json!("value"));
    let run_id = h.executor.start_run(&graph_id, initial).expect("start");

    let pending = h.executor.get_run(&run_id).expect("snapshot");
    assert_eq!(pending.status, RunStatus::Pending);
    assert!(pending.log.is_empty());
    assert_eq!(pending.current_node, None);
    assert_eq!(pending.state.get_str("seed"), Some("value"));

    h.executor.execute(&run_id).await.expect("execute");
    let finished = h.executor.get_run(&run_id).expect("snapshot");
    assert_eq!(finished.status, RunStatus::Completed);
}

#[tokio::test]
async fn detached_run_is_observable_through_polling() {
    let mut registry = NodeRegistry::new();
    for name in ["one", "two", "three"] {
        registry.register_fn(name, move |mut state: StateDoc, _registry| async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            state.push("visited", json!(name));
            Ok((state, Decision::UseDefault))
        });
    }

    let h = harness(registry);
    let graph_id = h.graphs.create(graph(
        &["one", "two", "three"],
        &[("one", Some("two")), ("two", Some("three"))],
        "one",
    ));
    let run_id = h.executor.start_run(&graph_id, StateDoc::new()).expect("start");

    let executor = h.executor.clone();
    let spawned = run_id.clone();
    let handle = tokio::spawn(async move { executor.execute(&spawned).await });

    // Log length only ever grows while the run is in flight.
    let mut last_len = 0;
    for _ in 0..200 {
        let record = h.executor.get_run(&run_id).expect("snapshot");
        assert!(record.log.len() >= last_len);
        last_len = record.log.len();
        if record.status.is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    handle.await.expect("join").expect("execute");
    let record = h.executor.get_run(&run_id).expect("snapshot");
    assert_eq!(record.status, RunStatus::Completed);
    assert_eq!(
        record.state.get("visited"),
        Some(&json!(["one", "two", "three"]))
    );
}

#[tokio::test]
async fn terminal_record_remains_queryable() {
    let mut registry = NodeRegistry::new();
    registry.register_fn("only", |state, _registry| async move {
        Ok((state, Decision::finish()))
    });

    let h = harness(registry);
    let graph_id = h.graphs.create(graph(&["only"], &[], "only"));
    let run_id = h.executor.start_run(&graph_id, StateDoc::new()).expect("start");
    h.executor.execute(&run_id).await.expect("execute");

    for _ in 0..3 {
        let record = h.executor.get_run(&run_id).expect("snapshot");
        assert_eq!(record.status, RunStatus::Completed);
    }

    // The store answers the same snapshot directly.
    let record = h.runs.snapshot(&run_id).expect("snapshot");
    assert_eq!(record.status, RunStatus::Completed);
}

#[tokio::test]
async fn snapshot_of_unknown_run_is_not_found() {
    let h = harness(NodeRegistry::new());
    match h.executor.get_run("missing-run") {
        Err(EngineError::RunNotFound(id)) => assert_eq!(id, "missing-run"),
        other => panic!("expected RunNotFound, got {other:?}"),
    }
}
