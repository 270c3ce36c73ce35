//! `toml::Value` sources.

use super::{json_snapshot, Keyed, Node};
use crate::core::types::Segment;
use toml::{Table, Value};

impl Keyed for Table {
    fn lookup(&self, key: &Segment) -> Option<&dyn Node> {
        self.get(&*key.as_name()).map(|v| v as &dyn Node)
    }
}

impl Node for Table {
    fn as_keyed(&self) -> Option<&dyn Keyed> {
        Some(self)
    }

    fn to_json(&self) -> serde_json::Value {
        json_snapshot(self)
    }
}

impl Node for Value {
    fn as_keyed(&self) -> Option<&dyn Keyed> {
        match self {
            Value::Table(table) => Some(table),
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        json_snapshot(self)
    }
}
