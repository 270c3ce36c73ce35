//! `serde_json::Value` sources.

use super::{Keyed, Node};
use crate::core::types::Segment;
use serde_json::{Map, Value};

impl Keyed for Map<String, Value> {
    fn lookup(&self, key: &Segment) -> Option<&dyn Node> {
        self.get(&*key.as_name()).map(|v| v as &dyn Node)
    }
}

impl Node for Map<String, Value> {
    fn as_keyed(&self) -> Option<&dyn Keyed> {
        Some(self)
    }

    fn to_json(&self) -> Value {
        Value::Object(self.clone())
    }
}

impl Node for Value {
    fn as_keyed(&self) -> Option<&dyn Keyed> {
        match self {
            Value::Object(map) => Some(map),
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    fn is_null(&self) -> bool {
        Value::is_null(self)
    }

    fn to_json(&self) -> Value {
        self.clone()
    }
}
