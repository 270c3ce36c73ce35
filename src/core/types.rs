//! Path specifications and traversal results.
//!
//! A path is either a scalar (a delimited string or a single integer) or an
//! ordered collection of nested paths. Results borrow from the source value
//! they were resolved against.

use crate::source::Node;
use indexmap::IndexMap;
use serde::de::{
    self, DeserializeOwned, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::any::Any;
use std::borrow::Cow;
use std::fmt;

/// Default path delimiter.
pub const DEFAULT_DELIMITER: &str = ".";

// ============================================================================
// Segments
// ============================================================================

/// One step of a scalar path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A piece of a split string path
    Name(String),
    /// An integer path, never split
    Index(i64),
}

impl Segment {
    /// The segment as a map key or field name.
    pub fn as_name(&self) -> Cow<'_, str> {
        match self {
            Self::Name(name) => Cow::Borrowed(name),
            Self::Index(index) => Cow::Owned(index.to_string()),
        }
    }

    /// The segment as an integer key. Names qualify only in canonical
    /// decimal form.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Name(name) => parse_canonical_integer(name),
            Self::Index(index) => Some(*index),
        }
    }

    /// The segment as a sequence position.
    pub fn as_position(&self) -> Option<usize> {
        self.as_integer().and_then(|i| usize::try_from(i).ok())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{}", name),
            Self::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<i64> for Segment {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

/// Parse `s` as an integer only if it is written the way the integer itself
/// would print: optional `-`, no leading zeros, no `+`, no whitespace.
pub fn parse_canonical_integer(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    if digits.len() != s.len() && digits == "0" {
        return None;
    }
    s.parse().ok()
}

// ============================================================================
// Path specifications
// ============================================================================

/// A single path: a delimited string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarPath {
    Str(String),
    Int(i64),
}

impl fmt::Display for ScalarPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{}", s),
            Self::Int(i) => write!(f, "{}", i),
        }
    }
}

/// Anything `traverse` accepts as a path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSpec {
    Scalar(ScalarPath),
    Collection(PathCollection),
    /// Not a path at all (booleans, floats, nulls). Always resolves to absent.
    Invalid,
}

impl PathSpec {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    pub fn as_scalar(&self) -> Option<&ScalarPath> {
        match self {
            Self::Scalar(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&PathCollection> {
        match self {
            Self::Collection(collection) => Some(collection),
            _ => None,
        }
    }
}

impl From<ScalarPath> for PathSpec {
    fn from(path: ScalarPath) -> Self {
        Self::Scalar(path)
    }
}

impl From<&str> for PathSpec {
    fn from(path: &str) -> Self {
        Self::Scalar(ScalarPath::Str(path.to_string()))
    }
}

impl From<String> for PathSpec {
    fn from(path: String) -> Self {
        Self::Scalar(ScalarPath::Str(path))
    }
}

impl From<&String> for PathSpec {
    fn from(path: &String) -> Self {
        Self::Scalar(ScalarPath::Str(path.clone()))
    }
}

impl From<i64> for PathSpec {
    fn from(path: i64) -> Self {
        Self::Scalar(ScalarPath::Int(path))
    }
}

impl From<i32> for PathSpec {
    fn from(path: i32) -> Self {
        Self::Scalar(ScalarPath::Int(i64::from(path)))
    }
}

impl From<u32> for PathSpec {
    fn from(path: u32) -> Self {
        Self::Scalar(ScalarPath::Int(i64::from(path)))
    }
}

impl From<usize> for PathSpec {
    fn from(path: usize) -> Self {
        i64::try_from(path).map_or(Self::Invalid, |i| Self::Scalar(ScalarPath::Int(i)))
    }
}

impl From<bool> for PathSpec {
    fn from(_: bool) -> Self {
        Self::Invalid
    }
}

impl From<f64> for PathSpec {
    fn from(_: f64) -> Self {
        Self::Invalid
    }
}

impl From<PathCollection> for PathSpec {
    fn from(collection: PathCollection) -> Self {
        Self::Collection(collection)
    }
}

impl<T: Into<PathSpec>> From<Vec<T>> for PathSpec {
    fn from(paths: Vec<T>) -> Self {
        Self::Collection(paths.into_iter().fold(PathCollection::new(), |c, p| c.path(p)))
    }
}

impl<T: Into<PathSpec>, const N: usize> From<[T; N]> for PathSpec {
    fn from(paths: [T; N]) -> Self {
        Self::Collection(paths.into_iter().fold(PathCollection::new(), |c, p| c.path(p)))
    }
}

// ============================================================================
// Path collections
// ============================================================================

/// Key of one path-collection entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    Index(usize),
    Name(String),
}

impl CollectionKey {
    /// The key read as a path, for path-in-key narrowing.
    pub fn to_scalar_path(&self) -> ScalarPath {
        match self {
            Self::Index(i) => i64::try_from(*i)
                .map_or_else(|_| ScalarPath::Str(i.to_string()), ScalarPath::Int),
            Self::Name(name) => ScalarPath::Str(name.clone()),
        }
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{}", i),
            Self::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<&str> for CollectionKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for CollectionKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for CollectionKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Container kind a reshaped output takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShapeKind {
    /// Keyed mapping output
    #[default]
    Mapping,
    /// Structured-object output
    Record,
}

/// How an entry's key takes part in resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKey<'c> {
    /// The next sequential index: the entry resolves against the unnarrowed
    /// source, and its output key is inferred.
    Position(usize),
    /// Any other key: a path that narrows the source first.
    Keyed(&'c CollectionKey),
}

/// Ordered mapping of keys to nested path specifications.
#[derive(Debug, Clone, Default)]
pub struct PathCollection {
    kind: ShapeKind,
    entries: IndexMap<CollectionKey, PathSpec>,
    next_index: usize,
}

impl PathCollection {
    /// An empty mapping-shaped collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty record-shaped collection.
    pub fn record() -> Self {
        Self::with_kind(ShapeKind::Record)
    }

    pub fn with_kind(kind: ShapeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Builder form of [`PathCollection::push`].
    pub fn path(mut self, spec: impl Into<PathSpec>) -> Self {
        self.push(spec);
        self
    }

    /// Builder form of [`PathCollection::insert`].
    pub fn entry(mut self, key: impl Into<CollectionKey>, spec: impl Into<PathSpec>) -> Self {
        self.insert(key, spec);
        self
    }

    /// Append at the next free index (one past the largest index so far).
    pub fn push(&mut self, spec: impl Into<PathSpec>) {
        let key = CollectionKey::Index(self.next_index);
        self.insert(key, spec);
    }

    /// Insert or replace. A replaced key keeps its position.
    pub fn insert(
        &mut self,
        key: impl Into<CollectionKey>,
        spec: impl Into<PathSpec>,
    ) -> Option<PathSpec> {
        let key = key.into();
        if let CollectionKey::Index(i) = key {
            self.next_index = self.next_index.max(i.saturating_add(1));
        }
        self.entries.insert(key, spec.into())
    }

    pub fn get(&self, key: &CollectionKey) -> Option<&PathSpec> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, CollectionKey, PathSpec> {
        self.entries.iter()
    }

    /// Entries with their keys classified as positional or keyed.
    ///
    /// An index key is positional when it is at or past the next free index
    /// at that point, the index [`PathCollection::push`] would have used or
    /// one after a gap. An index that goes back below an earlier one is
    /// keyed. Names are always keyed, even numeric-looking ones.
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            inner: self.entries.iter(),
            next_free: 0,
        }
    }
}

impl PartialEq for PathCollection {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.entries.iter().eq(other.entries.iter())
    }
}

impl<'c> IntoIterator for &'c PathCollection {
    type Item = (&'c CollectionKey, &'c PathSpec);
    type IntoIter = indexmap::map::Iter<'c, CollectionKey, PathSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<CollectionKey>, V: Into<PathSpec>> FromIterator<(K, V)> for PathCollection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut collection = Self::new();
        for (key, spec) in iter {
            collection.insert(key, spec);
        }
        collection
    }
}

/// Iterator returned by [`PathCollection::entries`].
pub struct Entries<'c> {
    inner: indexmap::map::Iter<'c, CollectionKey, PathSpec>,
    next_free: usize,
}

impl<'c> Iterator for Entries<'c> {
    type Item = (EntryKey<'c>, &'c PathSpec);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, spec) = self.inner.next()?;
        let entry = match key {
            CollectionKey::Index(i) if *i >= self.next_free => {
                self.next_free = i.saturating_add(1);
                EntryKey::Position(*i)
            }
            _ => EntryKey::Keyed(key),
        };
        Some((entry, spec))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

// ============================================================================
// Serde
// ============================================================================
//
// Strings are string paths and integers are integer paths. Sequences become
// positional collections, mappings keyed collections. Tags are transparent.
// Anything else is an invalid path.

impl Serialize for CollectionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Index(i) => serializer.serialize_u64(*i as u64),
            Self::Name(name) => serializer.serialize_str(name),
        }
    }
}

impl<'de> Deserialize<'de> for CollectionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CollectionKeyVisitor)
    }
}

struct CollectionKeyVisitor;

impl Visitor<'_> for CollectionKeyVisitor {
    type Value = CollectionKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer shape key")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(CollectionKey::Name(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(CollectionKey::Name(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(usize::try_from(v)
            .map_or_else(|_| CollectionKey::Name(v.to_string()), CollectionKey::Index))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        // negative keys can only be names
        Ok(usize::try_from(v)
            .map_or_else(|_| CollectionKey::Name(v.to_string()), CollectionKey::Index))
    }
}

impl Serialize for PathSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(ScalarPath::Str(path)) => serializer.serialize_str(path),
            Self::Scalar(ScalarPath::Int(index)) => serializer.serialize_i64(*index),
            Self::Collection(collection) => collection.serialize(serializer),
            Self::Invalid => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for PathSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PathSpecVisitor)
    }
}

struct PathSpecVisitor;

impl<'de> Visitor<'de> for PathSpecVisitor {
    type Value = PathSpec;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a path, a sequence of paths or a mapping of paths")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(PathSpec::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(PathSpec::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(PathSpec::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(i64::try_from(v).map_or(PathSpec::Invalid, PathSpec::from))
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(PathSpec::Invalid)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(PathSpec::Invalid)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PathSpec::Invalid)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PathSpec::Invalid)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        PathSpec::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut collection = PathCollection::new();
        while let Some(spec) = seq.next_element::<PathSpec>()? {
            collection.push(spec);
        }
        Ok(PathSpec::Collection(collection))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut collection = PathCollection::new();
        while let Some((key, spec)) = map.next_entry::<CollectionKey, PathSpec>()? {
            collection.insert(key, spec);
        }
        Ok(PathSpec::Collection(collection))
    }

    // YAML tags arrive as single-variant enums
    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Self::Value, A::Error> {
        let (_tag, variant) = data.variant::<de::IgnoredAny>()?;
        variant.newtype_variant::<PathSpec>()
    }
}

impl Serialize for PathCollection {
    /// Collections keyed `0..n` in order serialize as sequences, all others
    /// as mappings.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sequential = self
            .entries
            .keys()
            .enumerate()
            .all(|(n, key)| *key == CollectionKey::Index(n));

        if sequential {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for spec in self.entries.values() {
                seq.serialize_element(spec)?;
            }
            seq.end()
        } else {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (key, spec) in &self.entries {
                map.serialize_entry(key, spec)?;
            }
            map.end()
        }
    }
}

impl<'de> Deserialize<'de> for PathCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match PathSpec::deserialize(deserializer)? {
            PathSpec::Collection(collection) => Ok(collection),
            _ => Err(de::Error::custom("shape must be a mapping or a sequence")),
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Result of `traverse`: one value, absent, or one result per collection
/// entry.
#[derive(Debug, Clone)]
pub enum Resolved<'a> {
    Absent,
    Found(&'a dyn Node),
    Many(Vec<Resolved<'a>>),
}

impl<'a> Resolved<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The found value, if this is a single found result.
    pub fn value(&self) -> Option<&'a dyn Node> {
        match self {
            Self::Found(node) => Some(*node),
            _ => None,
        }
    }

    /// The `index`-th result of a multi-path resolution.
    pub fn get(&self, index: usize) -> Option<&Resolved<'a>> {
        self.as_many().and_then(|many| many.get(index))
    }

    pub fn as_many(&self) -> Option<&[Resolved<'a>]> {
        match self {
            Self::Many(many) => Some(many),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.value().and_then(|node| node.downcast_ref::<T>())
    }

    /// Owned JSON snapshot. Absent results become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Absent => serde_json::Value::Null,
            Self::Found(node) => node.to_json(),
            Self::Many(many) => serde_json::Value::Array(many.iter().map(Self::to_json).collect()),
        }
    }
}

impl<'a> From<Option<&'a dyn Node>> for Resolved<'a> {
    fn from(found: Option<&'a dyn Node>) -> Self {
        found.map_or(Self::Absent, Self::Found)
    }
}

/// Result of `reshape`: a fresh structure whose leaves borrow from the
/// source.
#[derive(Debug, Clone)]
pub enum Reshaped<'a> {
    Value(Option<&'a dyn Node>),
    Mapping(IndexMap<String, Reshaped<'a>>),
    Record(IndexMap<String, Reshaped<'a>>),
}

impl<'a> Reshaped<'a> {
    pub fn get(&self, key: &str) -> Option<&Reshaped<'a>> {
        self.fields().and_then(|fields| fields.get(key))
    }

    pub fn value(&self) -> Option<&'a dyn Node> {
        match self {
            Self::Value(node) => *node,
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.value().and_then(|node| node.downcast_ref::<T>())
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    /// Output entries of a mapping or record, in output order.
    pub fn fields(&self) -> Option<&IndexMap<String, Reshaped<'a>>> {
        match self {
            Self::Mapping(fields) | Self::Record(fields) => Some(fields),
            Self::Value(_) => None,
        }
    }

    pub fn keys(&self) -> Vec<&str> {
        self.fields()
            .map(|fields| fields.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Owned JSON snapshot. Absent leaves become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Value(None) => serde_json::Value::Null,
            Self::Value(Some(node)) => node.to_json(),
            Self::Mapping(fields) | Self::Record(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    /// Extract a typed value (usually a struct for record-shaped output).
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, String> {
        serde_json::from_value(self.to_json())
            .map_err(|e| format!("reshaped value does not fit target type: {}", e))
    }
}

impl Serialize for Reshaped<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
