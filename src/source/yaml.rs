//! `serde_yaml_ng::Value` sources.
//!
//! YAML mappings may carry integer keys, so a segment is tried as a string
//! key first and then, if it is a canonical integer, as an integer key.
//! Tags are transparent.

use super::{json_snapshot, Keyed, Node};
use crate::core::types::Segment;
use serde_yaml_ng::{Mapping, Value};

impl Keyed for Mapping {
    fn lookup(&self, key: &Segment) -> Option<&dyn Node> {
        let by_name = self.get(&*key.as_name());
        let found = by_name.or_else(|| {
            key.as_integer()
                .and_then(|i| self.get(&Value::Number(i.into())))
        });
        found.map(|v| v as &dyn Node)
    }
}

impl Node for Mapping {
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
            Value::Mapping(map) => Some(map),
            Value::Sequence(items) => Some(items),
            Value::Tagged(tagged) => tagged.value.as_keyed(),
            _ => None,
        }
    }

    fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Tagged(tagged) => tagged.value.is_null(),
            _ => false,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        json_snapshot(self)
    }
}
