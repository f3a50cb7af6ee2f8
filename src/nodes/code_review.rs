//! Code-review pipeline nodes.
//!
//! Four nodes that scan a Python-ish source blob in `state.code`, score it,
//! and loop the scoring stages until the quality threshold is met. The loop
//! is driven entirely by explicit routing decisions; the sample graph's
//! static edges describe only the straight-line pass.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::engine::error::EngineResult;
use crate::engine::graph::GraphDefinition;
use crate::engine::node::{Decision, NodeOutput};
use crate::engine::registry::NodeRegistry;
use crate::engine::state::StateDoc;

/// Quality threshold applied when `state.threshold` is absent.
const DEFAULT_THRESHOLD: i64 = 80;

/// Registers the four pipeline nodes.
pub fn register(registry: &mut NodeRegistry) {
    registry.register_fn("extract_functions", extract_functions);
    registry.register_fn("check_complexity", check_complexity);
    registry.register_fn("detect_issues", detect_issues);
    registry.register_fn("suggest_improvements", suggest_improvements);
}

/// The straight-line graph over the pipeline, started at extraction.
pub fn sample_graph() -> GraphDefinition {
    let mut edges = HashMap::new();
    edges.insert(
        "extract_functions".to_string(),
        Some("check_complexity".to_string()),
    );
    edges.insert(
        "check_complexity".to_string(),
        Some("detect_issues".to_string()),
    );
    edges.insert(
        "detect_issues".to_string(),
        Some("suggest_improvements".to_string()),
    );
    GraphDefinition::new(
        vec![
            "extract_functions".to_string(),
            "check_complexity".to_string(),
            "detect_issues".to_string(),
            "suggest_improvements".to_string(),
        ],
        edges,
        "extract_functions",
    )
}

/// Naive `def`-splitting scan of `state.code` into `{name, lines}` entries.
async fn extract_functions(
    mut state: StateDoc,
    _registry: Arc<NodeRegistry>,
) -> EngineResult<NodeOutput> {
    let code = state.get_str("code").unwrap_or_default().to_string();

    let mut functions = Vec::new();
    for (idx, part) in code.split("def ").enumerate() {
        if part.trim().is_empty() {
            continue;
        }
        let name = match part.split_once('(') {
            Some((head, _)) => head.trim().to_string(),
            None => format!("f{idx}"),
        };
        let lines = part.lines().count();
        functions.push(json!({"name": name, "lines": lines}));
    }

    let count = functions.len();
    state.set("functions", Value::Array(functions));
    state.push("log", json!(format!("Extracted {count} functions")));

    Ok((state, Decision::goto("check_complexity")))
}

/// Line-count heuristic: one complexity point per started block of ten lines.
async fn check_complexity(
    mut state: StateDoc,
    _registry: Arc<NodeRegistry>,
) -> EngineResult<NodeOutput> {
    if let Some(Value::Array(functions)) = state.get_mut("functions") {
        for function in functions.iter_mut() {
            let lines = function.get("lines").and_then(Value::as_i64).unwrap_or(0);
            if let Some(entry) = function.as_object_mut() {
                entry.insert("complexity".to_string(), json!((lines / 10 + 1).max(1)));
            }
        }
    }
    state.push("log", json!("Computed complexity"));

    Ok((state, Decision::goto("detect_issues")))
}

/// Flags functions that are too complex or too long.
async fn detect_issues(
    mut state: StateDoc,
    _registry: Arc<NodeRegistry>,
) -> EngineResult<NodeOutput> {
    let mut issues = Vec::new();
    if let Some(Value::Array(functions)) = state.get("functions") {
        for function in functions {
            let name = function
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            let complexity = function
                .get("complexity")
                .and_then(Value::as_i64)
                .unwrap_or(0);
            let lines = function.get("lines").and_then(Value::as_i64).unwrap_or(0);

            if complexity > 3 {
                issues.push(json!({"function": name, "issue": "high_complexity"}));
            }
            if lines > 200 {
                issues.push(json!({"function": name, "issue": "too_long"}));
            }
        }
    }

    let count = issues.len();
    state.set("issues", Value::Array(issues));
    state.push("log", json!(format!("Detected {count} issues")));

    Ok((state, Decision::goto("suggest_improvements")))
}

/// Scores the pass and loops back to the complexity check until the quality
/// threshold is reached.
async fn suggest_improvements(
    mut state: StateDoc,
    _registry: Arc<NodeRegistry>,
) -> EngineResult<NodeOutput> {
    let issues = match state.get("issues") {
        Some(Value::Array(issues)) => issues.clone(),
        _ => Vec::new(),
    };
    let suggestions: Vec<Value> = issues
        .iter()
        .map(|issue| {
            let name = issue
                .get("function")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            json!(format!("Improve {name}"))
        })
        .collect();
    state.set("suggestions", Value::Array(suggestions));

    let iteration = state
        .object_mut("meta")
        .get("iteration")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    let quality = (50 - 10 * issues.len() as i64 + 5 * iteration).clamp(0, 100);
    state.set("quality_score", json!(quality));
    state.push("log", json!(format!("Quality score {quality}")));

    let threshold = state.get_i64("threshold").unwrap_or(DEFAULT_THRESHOLD);
    if quality >= threshold {
        return Ok((state, Decision::finish()));
    }

    state
        .object_mut("meta")
        .insert("iteration".to_string(), json!(iteration + 1));
    Ok((state, Decision::goto("check_complexity")))
}
