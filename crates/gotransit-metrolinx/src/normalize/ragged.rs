//! Traversal of ragged upstream trees.
//!
//! The upstream serializer collapses a one-element collection into a bare
//! object and an empty one into `null` or nothing at all. These helpers
//! flatten all three shapes into plain sequences so normalizers never branch
//! on shape themselves.

use serde_json::{Map, Value};

use super::coerce::scalar_text;

/// One upstream entity: a JSON object.
pub(crate) type Record = Map<String, Value>;

/// Follows `path` through nested objects.
///
/// Returns `None` when a key is missing or an intermediate node is not an
/// object.
#[must_use]
pub(crate) fn at<'a>(tree: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(tree, |node, key| node.get(*key))
}

/// Flattens a ragged collection of structured entities.
///
/// `null` or absent gives an empty sequence, a single object gives one
/// element, an array gives its object members in order. Non-object members
/// and bare scalars are dropped.
#[must_use]
pub(crate) fn records(value: Option<&Value>) -> Vec<&Record> {
    match value {
        Some(Value::Object(map)) => vec![map],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
        _ => Vec::new(),
    }
}

/// [`records`] for the collection at `path` below `record`.
#[must_use]
pub(crate) fn records_in<'a>(record: &'a Record, path: &[&str]) -> Vec<&'a Record> {
    let Some((first, rest)) = path.split_first() else {
        return Vec::new();
    };
    records(record.get(*first).and_then(|node| at(node, rest)))
}

/// Flattens a ragged collection of plain codes.
///
/// Each member may be a scalar code or an object holding the code under
/// `key`. Members that yield no code are dropped.
#[must_use]
pub(crate) fn codes(value: Option<&Value>, key: &str) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(|item| code(item, key)).collect(),
        Some(item) => code(item, key).into_iter().collect(),
        None => Vec::new(),
    }
}

fn code(item: &Value, key: &str) -> Option<String> {
    match item {
        Value::Object(map) => map.get(key).and_then(scalar_text),
        other => scalar_text(other),
    }
}
