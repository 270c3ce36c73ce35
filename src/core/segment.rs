//! Path segmentation.
//!
//! - `0` becomes `[0]` (integers are never split)
//! - `foo` becomes `["foo"]`
//! - `foo.bar` becomes `["foo", "bar"]` with delimiter `.`
//! - `a..b` becomes `["a", "", "b"]` (empty segments are kept)
//! - with an empty delimiter the whole string is one segment

use super::types::{ScalarPath, Segment};

/// Split a scalar path into segments.
pub fn split_path(path: &ScalarPath, delimiter: &str) -> Vec<Segment> {
    match path {
        ScalarPath::Int(index) => vec![Segment::Index(*index)],
        ScalarPath::Str(path) if delimiter.is_empty() => vec![Segment::Name(path.clone())],
        ScalarPath::Str(path) => path
            .split(delimiter)
            .map(|piece| Segment::Name(piece.to_string()))
            .collect(),
    }
}

/// Last segment of a scalar path, used to infer shorthand output keys.
pub fn last_segment(path: &ScalarPath, delimiter: &str) -> Segment {
    match path {
        ScalarPath::Int(index) => Segment::Index(*index),
        ScalarPath::Str(path) if delimiter.is_empty() => Segment::Name(path.clone()),
        ScalarPath::Str(path) => {
            Segment::Name(path.rsplit(delimiter).next().unwrap_or(path).to_string())
        }
    }
}

/// Join segments back into a string path.
pub fn join_segments(segments: &[Segment], delimiter: &str) -> String {
    segments
        .iter()
        .map(|segment| segment.as_name())
        .collect::<Vec<_>>()
        .join(delimiter)
}
