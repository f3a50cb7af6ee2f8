//! Shared state document passed through a run.
//!
//! Nodes communicate exclusively through this document: each invocation
//! receives the current document by value and returns the updated one. The
//! engine never interprets the contents; the contract is insert, get, and
//! in-place mutation of JSON values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open-ended key/value blackboard shared by the nodes of one run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateDoc {
    values: Map<String, Value>,
}

impl StateDoc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from a JSON value; non-object values produce an
    /// empty document.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(values) => Self { values },
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.values.get_mut(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// String view of a value, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Integer view of a value, if present and numeric.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(Value::as_i64)
    }

    /// Mutable object under `key`, created (or coerced from a non-object)
    /// on first access.
    pub fn object_mut(&mut self, key: &str) -> &mut Map<String, Value> {
        let entry = self
            .values
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        entry.as_object_mut().expect("entry coerced to object")
    }

    /// Appends to the array under `key`, creating it on first push.
    pub fn push(&mut self, key: &str, value: Value) {
        let entry = self
            .values
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
        if let Value::Array(items) = entry {
            items.push(value);
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}
