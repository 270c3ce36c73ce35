//! Output assembly. Builds a new structure from a shape of paths.
//!
//! Each scalar leaf of the shape is resolved with `traverse`; each nested
//! collection becomes a nested output structure (nested keys name outputs,
//! they never narrow the source). Positional leaves infer their output key
//! from the last segment of their path. When two entries produce the same
//! key, the later one wins and moves to the later position.

use super::resolver::resolve_spec;
use super::segment::last_segment;
use super::types::{EntryKey, PathCollection, PathSpec, Reshaped, ShapeKind, DEFAULT_DELIMITER};
use crate::source::Node;
use indexmap::IndexMap;

/// Reshape `source` into the structure described by `shape`, using `.` as
/// the delimiter.
pub fn reshape<'a>(source: &'a dyn Node, shape: &PathCollection) -> Reshaped<'a> {
    reshape_with(source, shape, DEFAULT_DELIMITER)
}

/// Reshape `source` into the structure described by `shape`.
pub fn reshape_with<'a>(
    source: &'a dyn Node,
    shape: &PathCollection,
    delimiter: &str,
) -> Reshaped<'a> {
    let mut fields = IndexMap::with_capacity(shape.len());

    for (entry, spec) in shape.entries() {
        let key = output_key(entry, spec, delimiter);
        let value = match spec {
            PathSpec::Collection(nested) => reshape_with(source, nested, delimiter),
            leaf => Reshaped::Value(resolve_spec(Some(source), leaf, delimiter).value()),
        };

        if fields.shift_remove(&key).is_some() {
            log::trace!("output key '{}' reassigned, keeping the later entry", key);
        }
        fields.insert(key, value);
    }

    match shape.kind() {
        ShapeKind::Mapping => Reshaped::Mapping(fields),
        ShapeKind::Record => Reshaped::Record(fields),
    }
}

/// Output key for one shape entry.
pub fn output_key(entry: EntryKey<'_>, spec: &PathSpec, delimiter: &str) -> String {
    match (entry, spec) {
        (EntryKey::Keyed(key), _) => key.to_string(),
        (EntryKey::Position(_), PathSpec::Scalar(path)) => {
            last_segment(path, delimiter).to_string()
        }
        (EntryKey::Position(index), _) => index.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CollectionKey;
    use crate::fields_node;
    use serde_json::json;

    #[derive(Debug)]
    struct Flight {
        carrier: String,
        aircraft: String,
    }

    fields_node!(Flight { carrier, aircraft });

    #[test]
    fn test_reshape_descend_into_array() {
        let original = json!({"foo": {"bar": "baz"}});
        let shape = PathCollection::new()
            .entry("apple", "foo.bar")
            .entry("banana", "baz.bat");

        let out = reshape(&original, &shape);
        assert!(out.is_mapping());
        assert_eq!(out.to_json(), json!({"apple": "baz", "banana": null}));
        assert_eq!(out.keys(), vec!["apple", "banana"]);
        assert!(out.get("banana").unwrap().value().is_none());
    }

    #[test]
    fn test_scenario_nested_shape() {
        let original = json!({"ny": "albany", "nd": {"cap": "bismarck"}});
        let shape = PathCollection::new()
            .entry("new york", PathCollection::new().entry("capital", "ny"))
            .entry(
                "dakotas",
                PathCollection::new()
                    .entry("north", PathCollection::new().entry("capital", "nd.cap")),
            );

        assert_eq!(
            reshape(&original, &shape).to_json(),
            json!({
                "new york": {"capital": "albany"},
                "dakotas": {"north": {"capital": "bismarck"}}
            })
        );
    }

    #[test]
    fn test_reshape_into_multidimensional() {
        let original = json!({
            "ny": "albany",
            "nd": {"cap": "bismarck"},
            "sd": {"cap": "pierre"}
        });
        let shape = PathCollection::new()
            .entry("new york", PathCollection::new().entry("capital", "ny"))
            .entry(
                "dakotas",
                PathCollection::new()
                    .entry("north", PathCollection::new().entry("capital", "nd.cap"))
                    .entry("south", PathCollection::new().entry("capital", "sd.cap")),
            );

        let out = reshape(&original, &shape);
        assert_eq!(
            out.to_json(),
            json!({
                "new york": {"capital": "albany"},
                "dakotas": {
                    "north": {"capital": "bismarck"},
                    "south": {"capital": "pierre"}
                }
            })
        );
        let south = out.get("dakotas").and_then(|d| d.get("south")).unwrap();
        assert!(south.is_mapping());
    }

    #[test]
    fn test_reshape_into_record() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Fruit {
            apple: String,
            banana: Option<String>,
        }

        let original = json!({"foo": {"bar": "baz"}});
        let shape = PathCollection::record()
            .entry("apple", "foo.bar")
            .entry("banana", "baz.bat");

        let out = reshape(&original, &shape);
        assert!(out.is_record());
        assert_eq!(out.get("apple").unwrap().to_json(), json!("baz"));
        assert!(out.get("banana").unwrap().value().is_none());
        let fruit: Fruit = out.deserialize().unwrap();
        assert_eq!(
            fruit,
            Fruit {
                apple: "baz".to_string(),
                banana: None
            }
        );
    }

    #[test]
    fn test_nested_kinds_mirror_their_own_shape() {
        let original = json!({"a": 1});
        let shape = PathCollection::new().entry("inner", PathCollection::record().entry("x", "a"));
        let out = reshape(&original, &shape);
        assert!(out.is_mapping());
        assert!(out.get("inner").unwrap().is_record());
    }

    #[test]
    fn test_reshape_with_shorthand_paths() {
        let original = json!({
            "title": "hello, world!",
            "specs": {"language": "rust", "version": "9.9"}
        });
        let shape = PathCollection::new()
            .path("title")
            .path("specs.language")
            .entry("ver", "specs.version");

        let out = reshape(&original, &shape);
        assert_eq!(out.keys(), vec!["title", "language", "ver"]);
        assert_eq!(
            out.to_json(),
            json!({"title": "hello, world!", "language": "rust", "ver": "9.9"})
        );
    }

    #[test]
    fn test_shorthand_matches_explicit_key() {
        let original = json!({"a": {"b": {"c": 1}}});
        let shorthand = reshape(&original, &PathCollection::new().path("a.b.c"));
        let explicit = reshape(&original, &PathCollection::new().entry("c", "a.b.c"));
        assert_eq!(shorthand.to_json(), explicit.to_json());
        assert_eq!(shorthand.keys(), vec!["c"]);
    }

    #[test]
    fn test_reshape_multiple_sources() {
        let sources: Vec<Box<dyn Node>> = vec![
            Box::new(json!({"carrier": "delta", "aircraft": "A380"})),
            Box::new(Flight {
                carrier: "southwest".to_string(),
                aircraft: "737".to_string(),
            }),
        ];
        let shape = PathCollection::new().path("1.carrier").path("0.aircraft");

        assert_eq!(
            reshape(&sources, &shape).to_json(),
            json!({"carrier": "southwest", "aircraft": "A380"})
        );
    }

    #[test]
    fn test_reshape_key_collision() {
        let original = json!({
            "united states": {
                "capital": "washington, d.c.",
                "currency": "usd",
                "states": {"alaska": {"capital": "juneau"}}
            }
        });
        let shape = PathCollection::new()
            .entry("capital", PathCollection::new().entry("united states", "capital"))
            .path("united states.currency")
            .path("united states.states.alaska.capital");

        let out = reshape(&original, &shape);
        assert_eq!(out.keys(), vec!["currency", "capital"]);
        assert_eq!(out.to_json(), json!({"currency": "usd", "capital": "juneau"}));
    }

    #[test]
    fn test_collision_later_absent_still_wins() {
        let original = json!({"a": 1});
        let shape = PathCollection::new().entry("x", "a").entry("y", "a").path("missing.x");
        let out = reshape(&original, &shape);
        assert_eq!(out.keys(), vec!["y", "x"]);
        assert!(out.get("x").unwrap().value().is_none());
    }

    #[test]
    fn test_reshape_custom_delimiter() {
        let original = json!({"a": {"b": "ab"}, "a.b": "dotted"});
        let shape = PathCollection::new().path("a/b").entry("whole", "a.b");
        let out = reshape_with(&original, &shape, "/");
        assert_eq!(out.to_json(), json!({"b": "ab", "whole": "dotted"}));

        let out = reshape_with(&original, &PathCollection::new().path("a.b"), "");
        assert_eq!(out.to_json(), json!({"a.b": "dotted"}));
    }

    #[test]
    fn test_positional_collection_and_invalid_keys() {
        let original = json!({"a": 1, "b": 2});
        let shape = PathCollection::new()
            .path(PathCollection::new().path("a"))
            .path(true);

        let out = reshape(&original, &shape);
        assert_eq!(out.keys(), vec!["0", "1"]);
        assert_eq!(out.get("0").unwrap().to_json(), json!({"a": 1}));
        assert!(out.get("1").unwrap().value().is_none());
    }

    #[test]
    fn test_integer_leaf_infers_integer_key() {
        let original = json!(["zero", "one"]);
        let out = reshape(&original, &PathCollection::new().entry(0_usize, 1));
        assert_eq!(out.to_json(), json!({"1": "one"}));
    }

    #[test]
    fn test_backward_index_is_explicit_key() {
        let original = json!({"a": 1, "b": 2, "1": {"b": 7}});
        let shape = PathCollection::new().entry(2_usize, "a").entry(1_usize, "b");
        let out = reshape(&original, &shape);
        assert_eq!(out.keys(), vec!["a", "1"]);
        assert_eq!(out.to_json(), json!({"a": 1, "1": 7}));
    }

    #[test]
    fn test_push_after_index_gap_infers_keys() {
        let original = json!({"b": "bee", "d": "dee"});
        let shape = PathCollection::new().entry(5_usize, "b").path("d");
        let out = reshape(&original, &shape);
        assert_eq!(out.keys(), vec!["b", "d"]);
        assert_eq!(out.to_json(), json!({"b": "bee", "d": "dee"}));
    }

    #[test]
    fn test_reshape_does_not_touch_inputs() {
        let original = json!({"a": {"b": 1}});
        let shape = PathCollection::new().path("a.b").entry("n", "a");
        let before = (original.clone(), shape.clone());
        let first = reshape(&original, &shape).to_json();
        let second = reshape(&original, &shape).to_json();
        assert_eq!(first, second);
        assert_eq!((original, shape), before);
    }

    #[test]
    fn test_reshaped_leaves_borrow_source() {
        let original = json!({"a": {"b": [1, 2]}});
        let out = reshape(&original, &PathCollection::new().path("a.b"));
        let leaf = out.get("b").unwrap().downcast_ref::<serde_json::Value>().unwrap();
        assert!(std::ptr::eq(leaf, &original["a"]["b"]));
    }

    #[test]
    fn test_output_key_rules() {
        let named = CollectionKey::from("x");
        assert_eq!(output_key(EntryKey::Keyed(&named), &PathSpec::from("a.b"), "."), "x");
        assert_eq!(output_key(EntryKey::Position(0), &PathSpec::from("a.b"), "."), "b");
        assert_eq!(output_key(EntryKey::Position(0), &PathSpec::from("a.b"), ""), "a.b");
        assert_eq!(output_key(EntryKey::Position(2), &PathSpec::Invalid, "."), "2");
        assert_eq!(
            output_key(EntryKey::Position(1), &PathSpec::from(PathCollection::new()), "."),
            "1"
        );
    }
}
