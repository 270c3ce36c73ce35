//! Path resolution: single paths and path collections.
//!
//! A scalar path is split into segments and walked one lookup at a time. The
//! first missing key, null value or terminal value ends the walk with
//! nothing found. A path collection resolves each entry independently, in
//! order. Named keys (and out-of-sequence indices) are paths themselves: the
//! source is narrowed to that location before the entry's value is resolved.

use super::segment::split_path;
use super::types::{EntryKey, PathCollection, PathSpec, Resolved, Segment, DEFAULT_DELIMITER};
use crate::source::{access, Access, Node};

/// Pluck one or many values from `source` using `.` as the delimiter.
pub fn traverse(source: &dyn Node, path: impl Into<PathSpec>) -> Resolved<'_> {
    traverse_with(source, path, DEFAULT_DELIMITER)
}

/// Pluck one or many values from `source` with a custom delimiter.
/// An empty delimiter disables splitting.
pub fn traverse_with<'a>(
    source: &'a dyn Node,
    path: impl Into<PathSpec>,
    delimiter: &str,
) -> Resolved<'a> {
    resolve_spec(Some(source), &path.into(), delimiter)
}

/// Walk pre-split `segments` from `source`. No segments yields `source`.
pub fn resolve<'a>(source: &'a dyn Node, segments: &[Segment]) -> Option<&'a dyn Node> {
    let Some((key, rest)) = segments.split_first() else {
        return Some(source);
    };

    let next = lookup(source, key)?;

    if rest.is_empty() {
        return Some(next);
    }

    resolve(next, rest)
}

/// Resolve any path specification against a possibly absent source.
pub(crate) fn resolve_spec<'a>(
    source: Option<&'a dyn Node>,
    spec: &PathSpec,
    delimiter: &str,
) -> Resolved<'a> {
    match spec {
        PathSpec::Scalar(path) => source
            .and_then(|source| resolve(source, &split_path(path, delimiter)))
            .into(),
        PathSpec::Collection(collection) => {
            Resolved::Many(resolve_collection(source, collection, delimiter))
        }
        PathSpec::Invalid => {
            log::trace!("invalid path specification resolves to absent");
            Resolved::Absent
        }
    }
}

fn resolve_collection<'a>(
    source: Option<&'a dyn Node>,
    collection: &PathCollection,
    delimiter: &str,
) -> Vec<Resolved<'a>> {
    collection
        .entries()
        .map(|(entry, spec)| {
            let effective = match entry {
                EntryKey::Position(_) => source,
                EntryKey::Keyed(key) => source.and_then(|source| {
                    resolve(source, &split_path(&key.to_scalar_path(), delimiter))
                }),
            };
            resolve_spec(effective, spec, delimiter)
        })
        .collect()
}

/// One descent step. Missing, non-existent and null entries are all `None`.
fn lookup<'a>(source: &'a dyn Node, key: &Segment) -> Option<&'a dyn Node> {
    let found = match access(source) {
        Access::Keyed(container) => container.lookup(key),
        Access::Offset(accessor) => {
            if accessor.offset_exists(key) {
                accessor.offset_get(key)
            } else {
                None
            }
        }
        Access::Fields(object) => object.field(&key.as_name()),
        Access::Terminal => {
            log::trace!("cannot descend into terminal value at '{}'", key);
            return None;
        }
    };

    match found {
        Some(next) if next.is_null() => {
            log::trace!("null value at '{}'", key);
            None
        }
        Some(next) => Some(next),
        None => {
            log::trace!("no entry for '{}'", key);
            None
        }
    }
}
