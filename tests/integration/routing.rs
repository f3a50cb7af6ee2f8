use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::helpers::engine::{graph, harness};
use flowrun::prelude::*;
use serde_json::json;

#[tokio::test]
async fn explicit_decision_overrides_static_edge() {
    let mut registry = NodeRegistry::new();
    registry.register_fn("entry", |state, _registry| async move {
        Ok((state, Decision::goto("detour")))
    });
    registry.register_fn("mainline", |mut state: StateDoc, _registry| async move {
        state.set("mainline", json!(true));
        Ok((state, Decision::finish()))
    });
    registry.register_fn("detour", |mut state: StateDoc, _registry| async move {
        state.set("detour", json!(true));
        Ok((state, Decision::finish()))
    });

    let h = harness(registry);
    let graph_id = h.graphs.create(graph(
        &["entry", "mainline", "detour"],
        &[("entry", Some("mainline"))],
        "entry",
    ));
    let run_id = h.executor.start_run(&graph_id, StateDoc::new()).expect("start");
    h.executor.execute(&run_id).await.expect("execute");

    let record = h.executor.get_run(&run_id).expect("snapshot");
    assert_eq!(record.status, RunStatus::Completed);
    assert_eq!(record.state.get("detour"), Some(&json!(true)));
    assert_eq!(record.state.get("mainline"), None);
    assert_eq!(record.log[1], "entry -> detour");
}

#[tokio::test]
async fn explicit_finish_overrides_static_edge() {
    let mut registry = NodeRegistry::new();
    registry.register_fn("entry", |state, _registry| async move {
        Ok((state, Decision::finish()))
    });
    registry.register_fn("never", |mut state: StateDoc, _registry| async move {
        state.set("never", json!(true));
        Ok((state, Decision::finish()))
    });

    let h = harness(registry);
    let graph_id = h
        .graphs
        .create(graph(&["entry", "never"], &[("entry", Some("never"))], "entry"));
    let run_id = h.executor.start_run(&graph_id, StateDoc::new()).expect("start");
    h.executor.execute(&run_id).await.expect("execute");

    let record = h.executor.get_run(&run_id).expect("snapshot");
    assert_eq!(record.status, RunStatus::Completed);
    assert_eq!(record.state.get("never"), None);
    assert_eq!(record.log.len(), 2); // start + completion, no transition taken
}

#[tokio::test]
async fn self_loop_fails_after_exactly_the_step_budget() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invocations);

    let mut registry = NodeRegistry::new();
    registry.register_fn("spin", move |state, _registry| {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok((state, Decision::goto("spin")))
        }
    });

    let h = harness(registry);
    let graph_id = h.graphs.create(graph(&["spin"], &[], "spin"));
    let run_id = h.executor.start_run(&graph_id, StateDoc::new()).expect("start");
    h.executor.execute(&run_id).await.expect("execute");

    let record = h.executor.get_run(&run_id).expect("snapshot");
    assert_eq!(record.status, RunStatus::Failed);
    assert_eq!(invocations.load(Ordering::SeqCst), MAX_STEPS);
    assert!(record
        .log
        .last()
        .is_some_and(|line| line.contains("Step budget")));
}

#[tokio::test]
async fn conditional_loop_runs_exactly_four_times() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invocations);

    let mut registry = NodeRegistry::new();
    registry.register_fn("check", move |mut state: StateDoc, _registry| {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            let seen = state.get_i64("counter").unwrap_or(0);
            state.set("counter", json!(seen + 1));
            let decision = if seen < 3 {
                Decision::goto("check")
            } else {
                Decision::finish()
            };
            Ok((state, decision))
        }
    });

    let h = harness(registry);
    let graph_id = h.graphs.create(graph(&["check"], &[], "check"));
    let mut initial = StateDoc::new();
    initial.set("counter", json!(0));
    let run_id = h.executor.start_run(&graph_id, initial).expect("start");
    h.executor.execute(&run_id).await.expect("execute");

    let record = h.executor.get_run(&run_id).expect("snapshot");
    assert_eq!(record.status, RunStatus::Completed);
    assert_eq!(invocations.load(Ordering::SeqCst), 4);
    assert_eq!(record.state.get_i64("counter"), Some(4));
}
