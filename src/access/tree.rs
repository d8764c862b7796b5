//! Path-based reads and writes over [`Value`] trees.

use serde_json::{Map, Value};

use crate::access::TreePath;

// -----------------------------------------------------------------------------
// get

/// Reads the value at `path`.
///
/// Returns `None` when the path is empty or any segment is absent. A field
/// that holds an explicit `null` is `Some(&Value::Null)`, which callers must
/// distinguish from absence.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use treebind::access::{get, TreePath};
///
/// let tree = json!({"a": [{"bar": {"c": 3}}]});
/// assert_eq!(get(&tree, &TreePath::parse("a[0].bar.c")), Some(&json!(3)));
/// assert_eq!(get(&tree, &TreePath::parse("a.bar.c")), None);
/// ```
pub fn get<'a>(tree: &'a Value, path: &TreePath) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    let mut node = tree;
    for segment in path.segments() {
        node = match node {
            Value::Object(map) => map.get(segment.as_ref())?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// [`get`] with a fallback for absent paths.
///
/// Mirrors the usual "get with default" helper: only absence falls back, an
/// explicit `null` is returned as-is.
#[inline]
pub fn get_or<'a>(tree: &'a Value, path: &TreePath, default: &'a Value) -> &'a Value {
    get(tree, path).unwrap_or(default)
}

// -----------------------------------------------------------------------------
// set

/// Writes `value` at `path`, materializing intermediate objects.
///
/// Existing arrays are indexed (and padded with `null` up to the index) when
/// the segment is numeric; every other non-container node on the way is
/// replaced by an empty object. An empty path leaves the tree untouched.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use treebind::access::{set, TreePath};
///
/// let mut tree = json!({});
/// set(&mut tree, &TreePath::parse("address.city"), json!("Reims"));
/// assert_eq!(tree, json!({"address": {"city": "Reims"}}));
/// ```
pub fn set(tree: &mut Value, path: &TreePath, value: Value) {
    let Some((last, front)) = path.segments().split_last() else {
        return;
    };

    let mut node = tree;
    for segment in front {
        node = step_into(node, segment);
    }
    place(node, last, value);
}

// Descends one segment, materializing the slot it lands on as a container.
fn step_into<'a>(node: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = segment.parse::<usize>().ok();

    let as_array = index.is_some() && node.is_array();
    if !as_array && !node.is_object() {
        *node = Value::Object(Map::new());
    }

    match node {
        Value::Array(items) => {
            let index = index.unwrap_or_default();
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            prepare_slot(&mut items[index])
        }
        Value::Object(map) => {
            prepare_slot(map.entry(segment.to_string()).or_insert(Value::Null))
        }
        _ => node,
    }
}

fn prepare_slot(slot: &mut Value) -> &mut Value {
    if !slot.is_object() && !slot.is_array() {
        *slot = Value::Object(Map::new());
    }
    slot
}

// Final assignment into the parent container.
fn place(node: &mut Value, segment: &str, value: Value) {
    let index = segment.parse::<usize>().ok();

    let as_array = index.is_some() && node.is_array();
    if !as_array && !node.is_object() {
        *node = Value::Object(Map::new());
    }

    match node {
        Value::Array(items) => {
            let index = index.unwrap_or_default();
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            items[index] = value;
        }
        Value::Object(map) => {
            map.insert(segment.to_string(), value);
        }
        _ => {}
    }
}
