//! Flattening nested documents into addressable leaf fields, and back.
//!
//! A document like `{"user": {"tags": ["a", "b"]}}` flattens to the fields
//! `user.tags.0` and `user.tags.1` (or `user.tags[0]` with bracket notation).
//! [`unflatten`] rebuilds the tree from those paths: a segment becomes an
//! array when the segment after it is purely numeric, an object otherwise.
//!
//! Object keys are escaped so every key survives the trip. A backslash goes
//! before `\`, `.`, `[` and `]`, and before an all-digit key so it is not
//! read back as an index. The empty key is written `\e`:
//!
//! | key    | path segment |
//! |--------|--------------|
//! | `a.b`  | `a\.b`       |
//! | `0`    | `\0`         |
//! | (empty) | `\e`        |
//!
//! An index more than [`MAX_INDEX_GAP`] past the end of its array is kept as
//! an object key rather than padding the array with nulls.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::detect::{detect_type, ValueType};

/// How array indices appear in flattened paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayNotation {
    /// `items.0.name`
    #[default]
    Dot,
    /// `items[0].name`
    Bracket,
}

/// Options for [`flatten`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlattenOptions {
    /// Deepest nesting level to descend into; `None` is unlimited.
    /// A container found at this depth is emitted whole as one field.
    pub max_depth: Option<usize>,
    pub array_notation: ArrayNotation,
    /// Also emit a field for every object and array before its children.
    pub include_containers: bool,
    /// Paths to leave out, together with everything below them.
    pub exclude_paths: BTreeSet<String>,
    /// Visit object keys in sorted order instead of document order.
    pub sort_keys: bool,
}

impl FlattenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn array_notation(mut self, notation: ArrayNotation) -> Self {
        self.array_notation = notation;
        self
    }

    pub fn include_containers(mut self, include: bool) -> Self {
        self.include_containers = include;
        self
    }

    pub fn exclude(mut self, path: impl Into<String>) -> Self {
        self.exclude_paths.insert(path.into());
        self
    }

    pub fn sort_keys(mut self, sort: bool) -> Self {
        self.sort_keys = sort;
        self
    }
}

/// One leaf (or container, when requested) of a flattened document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedField {
    pub path: String,
    pub value: Value,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Nesting level; top-level fields are at depth 0.
    pub depth: usize,
    pub is_array_element: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_index: Option<usize>,
}

impl FlattenedField {
    /// Creates a top-level field, as produced when editing a flat row.
    pub fn new(path: impl Into<String>, value: Value) -> Self {
        let value_type = detect_type(&value);
        FlattenedField {
            path: path.into(),
            value,
            value_type,
            depth: 0,
            is_array_element: false,
            array_index: None,
        }
    }
}

/// Flattens a document into leaf fields, depth first.
///
/// Root-level primitives produce nothing. Empty objects and arrays, and
/// extended JSON wrappers such as `{"$oid": ..}`, are emitted as leaves.
///
/// # Example
///
/// ```
/// use omniquery_document::{flatten, unflatten, FlattenOptions};
/// use serde_json::json;
///
/// let doc = json!({"name": "Ada", "langs": ["en", "fr"], "meta": {"age": 36}});
/// let fields = flatten(&doc, &FlattenOptions::default());
/// let paths: Vec<_> = fields.iter().map(|f| f.path.as_str()).collect();
/// assert_eq!(paths, ["name", "langs.0", "langs.1", "meta.age"]);
/// assert_eq!(unflatten(&fields), doc);
/// ```
pub fn flatten(document: &Value, options: &FlattenOptions) -> Vec<FlattenedField> {
    let mut fields = Vec::new();
    let mut walker = Walker {
        options,
        fields: &mut fields,
    };
    walker.children("", document, 0);
    fields
}

struct Walker<'a> {
    options: &'a FlattenOptions,
    fields: &'a mut Vec<FlattenedField>,
}

impl Walker<'_> {
    /// Visits the children of a container found at `path`.
    fn children(&mut self, path: &str, value: &Value, depth: usize) {
        match value {
            Value::Object(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                if self.options.sort_keys {
                    keys.sort();
                }
                for key in keys {
                    let segment = escape_key(key);
                    let child_path = if path.is_empty() {
                        segment
                    } else {
                        format!("{}.{}", path, segment)
                    };
                    self.visit(child_path, &map[key.as_str()], depth, None);
                }
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let child_path = match (self.options.array_notation, path.is_empty()) {
                        (ArrayNotation::Dot, true) => index.to_string(),
                        (ArrayNotation::Dot, false) => format!("{}.{}", path, index),
                        (ArrayNotation::Bracket, _) => format!("{}[{}]", path, index),
                    };
                    self.visit(child_path, item, depth, Some(index));
                }
            }
            _ => {}
        }
    }

    fn visit(&mut self, path: String, value: &Value, depth: usize, index: Option<usize>) {
        if self.options.exclude_paths.contains(&path) {
            return;
        }
        let value_type = detect_type(value);
        let is_empty = match value {
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => true,
        };
        let at_limit = self.options.max_depth.is_some_and(|max| depth >= max);

        if value_type.is_atomic() || is_empty || at_limit {
            self.emit(path, value, value_type, depth, index);
            return;
        }
        if self.options.include_containers {
            self.emit(path.clone(), value, value_type, depth, index);
        }
        self.children(&path, value, depth + 1);
    }

    fn emit(
        &mut self,
        path: String,
        value: &Value,
        value_type: ValueType,
        depth: usize,
        index: Option<usize>,
    ) {
        self.fields.push(FlattenedField {
            path,
            value: value.clone(),
            value_type,
            depth,
            is_array_element: index.is_some(),
            array_index: index,
        });
    }
}

/// Rebuilds a document from flattened fields.
///
/// Paths may use either notation. Later fields overwrite earlier ones at
/// the same path. Fields with an empty path are ignored.
pub fn unflatten(fields: &[FlattenedField]) -> Value {
    unflatten_pairs(fields.iter().map(|f| (f.path.as_str(), f.value.clone())))
}

/// Rebuilds a document from `(path, value)` pairs.
///
/// ```
/// use omniquery_document::unflatten_pairs;
/// use serde_json::json;
///
/// let doc = unflatten_pairs([("a.b[1]", json!(2)), ("a.b[0]", json!(1)), ("c", json!(null))]);
/// assert_eq!(doc, json!({"a": {"b": [1, 2]}, "c": null}));
/// ```
pub fn unflatten_pairs<I, P>(pairs: I) -> Value
where
    I: IntoIterator<Item = (P, Value)>,
    P: AsRef<str>,
{
    let mut root = Value::Null;
    for (path, value) in pairs {
        let segments = parse_path(path.as_ref());
        let Some(first) = segments.first() else {
            continue;
        };
        ensure_container(&mut root, first.is_index());
        insert(&mut root, &segments, value);
    }
    if root.is_null() {
        Value::Object(Map::new())
    } else {
        root
    }
}

/// Furthest an index may land past the end of its array.
pub const MAX_INDEX_GAP: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    /// Unescaped, all digits.
    Index(String),
}

impl Segment {
    fn as_str(&self) -> &str {
        match self {
            Segment::Key(s) | Segment::Index(s) => s,
        }
    }

    fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }

    /// The array position this segment addresses in an array of `len`
    /// items, if it is close enough to the end.
    fn index_within(&self, len: usize) -> Option<usize> {
        match self {
            Segment::Index(digits) => digits
                .parse::<usize>()
                .ok()
                .filter(|&index| index <= len.saturating_add(MAX_INDEX_GAP)),
            Segment::Key(_) => None,
        }
    }
}

fn escape_key(key: &str) -> String {
    if key.is_empty() {
        return "\\e".to_string();
    }
    let mut out = String::with_capacity(key.len() + 1);
    if is_digits(key) {
        out.push('\\');
    }
    for c in key.chars() {
        if matches!(c, '\\' | '.' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Splits a dot or bracket path into segments, honoring escapes.
fn parse_path(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                escaped = true;
                match chars.next() {
                    Some('e') => {}
                    Some(other) => current.push(other),
                    None => current.push('\\'),
                }
            }
            '.' | '[' | ']' => end_segment(&mut segments, &mut current, &mut escaped),
            other => current.push(other),
        }
    }
    end_segment(&mut segments, &mut current, &mut escaped);
    segments
}

fn end_segment(segments: &mut Vec<Segment>, current: &mut String, escaped: &mut bool) {
    let text = std::mem::take(current);
    if *escaped {
        segments.push(Segment::Key(text));
    } else if is_digits(&text) {
        segments.push(Segment::Index(text));
    } else if !text.is_empty() {
        segments.push(Segment::Key(text));
    }
    *escaped = false;
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Makes `slot` an array (or object) unless it already is a container.
///
/// A scalar placeholder is replaced. An array asked to hold a named key is
/// turned into an object keyed by its indices.
fn ensure_container(slot: &mut Value, want_array: bool) {
    match slot {
        Value::Object(_) => {}
        Value::Array(items) if !want_array => {
            tracing::debug!("array re-keyed as object while unflattening");
            let map = std::mem::take(items)
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect();
            *slot = Value::Object(map);
        }
        Value::Array(_) => {}
        _ if want_array => *slot = Value::Array(Vec::new()),
        _ => *slot = Value::Object(Map::new()),
    }
}

fn insert(node: &mut Value, segments: &[Segment], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    let misfit = matches!(node, Value::Array(items) if head.index_within(items.len()).is_none());
    if misfit {
        ensure_container(node, false);
    }
    let slot = match node {
        Value::Array(items) => {
            let Some(index) = head.index_within(items.len()) else {
                return;
            };
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            &mut items[index]
        }
        Value::Object(map) => map.entry(head.as_str().to_string()).or_insert(Value::Null),
        _ => return,
    };
    match rest.first() {
        None => *slot = value,
        Some(next) => {
            ensure_container(slot, next.is_index());
            insert(slot, rest, value);
        }
    }
}
