//! Std and indexmap containers, plus transparent wrappers.

use super::{Fields, Keyed, Node, OffsetAccess};
use crate::core::types::Segment;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;

impl<T: Node> Keyed for Vec<T> {
    fn lookup(&self, key: &Segment) -> Option<&dyn Node> {
        key.as_position()
            .and_then(|i| self.get(i))
            .map(|v| v as &dyn Node)
    }
}

impl<T: Node> Node for Vec<T> {
    fn as_keyed(&self) -> Option<&dyn Keyed> {
        Some(self)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.iter().map(Node::to_json).collect())
    }
}

macro_rules! string_keyed_map {
    ($($map:ident),* $(,)?) => {
        $(
            impl<T: Node> Keyed for $map<String, T> {
                fn lookup(&self, key: &Segment) -> Option<&dyn Node> {
                    self.get(&*key.as_name()).map(|v| v as &dyn Node)
                }
            }

            impl<T: Node> Node for $map<String, T> {
                fn as_keyed(&self) -> Option<&dyn Keyed> {
                    Some(self)
                }

                fn to_json(&self) -> serde_json::Value {
                    serde_json::Value::Object(
                        self.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
                    )
                }
            }
        )*
    };
}

string_keyed_map!(HashMap, BTreeMap, IndexMap);

impl<T: Node> Node for Option<T> {
    fn as_keyed(&self) -> Option<&dyn Keyed> {
        self.as_ref().and_then(Node::as_keyed)
    }

    fn as_offset_access(&self) -> Option<&dyn OffsetAccess> {
        self.as_ref().and_then(Node::as_offset_access)
    }

    fn as_fields(&self) -> Option<&dyn Fields> {
        self.as_ref().and_then(Node::as_fields)
    }

    fn is_null(&self) -> bool {
        self.as_ref().is_none_or(Node::is_null)
    }

    fn to_json(&self) -> serde_json::Value {
        self.as_ref()
            .map_or(serde_json::Value::Null, Node::to_json)
    }
}

macro_rules! transparent_wrapper {
    ($($wrapper:ident),* $(,)?) => {
        $(
            impl<T: Node + ?Sized> Node for $wrapper<T> {
                fn as_keyed(&self) -> Option<&dyn Keyed> {
                    (**self).as_keyed()
                }

                fn as_offset_access(&self) -> Option<&dyn OffsetAccess> {
                    (**self).as_offset_access()
                }

                fn as_fields(&self) -> Option<&dyn Fields> {
                    (**self).as_fields()
                }

                fn is_null(&self) -> bool {
                    (**self).is_null()
                }

                fn to_json(&self) -> serde_json::Value {
                    (**self).to_json()
                }
            }
        )*
    };
}

transparent_wrapper!(Box, Rc, Arc);
