//! Pluck: read-only traversal of nested data.
//!
//! `traverse` fetches one value, or many values at once, from any structure
//! that implements [`Node`] by following delimited paths. `reshape` builds a
//! new structure from a shape of paths. Sources are never modified, and
//! results borrow from them.
//!
//! ```
//! use pluck::{reshape, traverse, PathCollection};
//! use serde_json::json;
//!
//! let post = json!({"title": "hi", "specs": {"language": "rust"}});
//! assert_eq!(traverse(&post, "specs.language").to_json(), json!("rust"));
//! assert!(traverse(&post, "specs.version").is_absent());
//!
//! let shape = PathCollection::new().path("title").entry("lang", "specs.language");
//! assert_eq!(
//!     reshape(&post, &shape).to_json(),
//!     json!({"title": "hi", "lang": "rust"})
//! );
//! ```

pub mod core;
pub mod source;

pub use crate::core::parser::{
    parse_path_spec, parse_shape_config, parse_shape_file, path_spec_from_json,
    path_spec_from_yaml, validate_shape, ShapeConfig, ValidationError,
};
pub use crate::core::reshape::{output_key, reshape, reshape_with};
pub use crate::core::resolver::{resolve, traverse, traverse_with};
pub use crate::core::segment::{join_segments, last_segment, split_path};
pub use crate::core::types::{
    parse_canonical_integer, CollectionKey, Entries, EntryKey, PathCollection, PathSpec,
    Reshaped, Resolved, ScalarPath, Segment, ShapeKind, DEFAULT_DELIMITER,
};
pub use crate::source::{access, Access, AsAny, Fields, Keyed, Node, OffsetAccess};

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
