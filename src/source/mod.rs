//! Source capabilities: how the traversal engine looks inside a value.
//!
//! Every value the engine can visit implements [`Node`]. At each descent step
//! the engine asks the node which lookup capability it offers, in this order:
//!
//! 1. [`Keyed`]: a built-in keyed container (maps, sequences)
//! 2. [`OffsetAccess`]: an explicit accessor with its own existence test
//! 3. [`Fields`]: a structured object with named fields
//!
//! A node offering none of them is terminal: descending into it finds nothing.

pub mod collections;
pub mod json;
pub mod scalar;
pub mod toml;
pub mod yaml;

use crate::core::types::Segment;
use std::any::Any;
use std::fmt;

/// Upcast helper so results can be downcast back to their concrete type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A value the traversal engine can visit.
///
/// All capability hooks default to "not supported", so a terminal type only
/// needs [`Node::to_json`].
pub trait Node: AsAny + fmt::Debug + 'static {
    /// Built-in keyed container view (maps, sequences).
    fn as_keyed(&self) -> Option<&dyn Keyed> {
        None
    }

    /// Accessor view with an explicit existence test.
    fn as_offset_access(&self) -> Option<&dyn OffsetAccess> {
        None
    }

    /// Named-field view for structured objects.
    fn as_fields(&self) -> Option<&dyn Fields> {
        None
    }

    /// Null values stop descent exactly like missing ones.
    fn is_null(&self) -> bool {
        false
    }

    /// Owned JSON snapshot of this value, used when results leave the borrow.
    fn to_json(&self) -> serde_json::Value;
}

impl dyn Node {
    /// Downcast to the concrete type behind this node.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// JSON snapshot of a serializable source. Values JSON cannot hold (such as
/// YAML mappings with sequence keys) become `null`, with a warning.
pub(crate) fn json_snapshot<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        log::warn!("value has no JSON snapshot, using null: {}", e);
        serde_json::Value::Null
    })
}

/// Keyed container lookup. `None` means no entry.
pub trait Keyed {
    fn lookup(&self, key: &Segment) -> Option<&dyn Node>;
}

/// Accessor-style lookup: existence is decided by the accessor, not by the
/// getter.
pub trait OffsetAccess {
    fn offset_exists(&self, key: &Segment) -> bool;

    fn offset_get(&self, key: &Segment) -> Option<&dyn Node>;
}

/// Named-field lookup for structured objects.
pub trait Fields {
    fn field(&self, name: &str) -> Option<&dyn Node>;
}

/// The capability a node offers for one descent step.
pub enum Access<'a> {
    Keyed(&'a dyn Keyed),
    Offset(&'a dyn OffsetAccess),
    Fields(&'a dyn Fields),
    Terminal,
}

impl fmt::Debug for Access<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyed(_) => write!(f, "keyed"),
            Self::Offset(_) => write!(f, "offset"),
            Self::Fields(_) => write!(f, "fields"),
            Self::Terminal => write!(f, "terminal"),
        }
    }
}

/// Pick the capability used to descend into `node`.
pub fn access(node: &dyn Node) -> Access<'_> {
    if let Some(keyed) = node.as_keyed() {
        Access::Keyed(keyed)
    } else if let Some(offset) = node.as_offset_access() {
        Access::Offset(offset)
    } else if let Some(fields) = node.as_fields() {
        Access::Fields(fields)
    } else {
        Access::Terminal
    }
}

/// Implement [`Node`] and [`Fields`] for a plain struct from its field list.
///
/// ```
/// use pluck::{fields_node, traverse};
///
/// #[derive(Debug)]
/// struct Post {
///     title: String,
///     views: u64,
/// }
///
/// fields_node!(Post { title, views });
///
/// let post = Post { title: "hello".to_string(), views: 3 };
/// assert_eq!(traverse(&post, "views").downcast_ref::<u64>(), Some(&3));
/// ```
#[macro_export]
macro_rules! fields_node {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Fields for $ty {
            fn field(&self, name: &str) -> ::core::option::Option<&dyn $crate::Node> {
                match name {
                    $(stringify!($field) => ::core::option::Option::Some(&self.$field as &dyn $crate::Node),)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl $crate::Node for $ty {
            fn as_fields(&self) -> ::core::option::Option<&dyn $crate::Fields> {
                ::core::option::Option::Some(self)
            }

            fn to_json(&self) -> $crate::__private::serde_json::Value {
                #[allow(unused_mut)]
                let mut map = $crate::__private::serde_json::Map::new();
                $(
                    map.insert(
                        stringify!($field).to_string(),
                        $crate::Node::to_json(&self.$field),
                    );
                )*
                $crate::__private::serde_json::Value::Object(map)
            }
        }
    };
}
