//! Read and write helpers that walk a [`Value`] along a [`PropertyPath`].
//!
//! Objects are addressed by key. Arrays are addressed by numeric segments;
//! a non-numeric segment never matches an array element.

use serde_json::{Map, Value};

use super::PropertyPath;

fn array_index(segment: &str) -> Option<usize> {
    segment.parse().ok()
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => array_index(segment).and_then(|index| items.get(index)),
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => array_index(segment).and_then(|index| items.get_mut(index)),
        _ => None,
    }
}

/// Returns the value at `path`, or `None` when any segment is missing.
///
/// # Examples
///
/// ```
/// use prop_loader::path::{get_at, PropertyPath};
/// use serde_json::json;
///
/// let tree = json!({"a": {"b": [10, 20]}});
/// let path = PropertyPath::parse("a.b.1")?;
/// assert_eq!(get_at(&tree, &path), Some(&json!(20)));
/// # Ok::<_, std::sync::Arc<prop_loader::PropError>>(())
/// ```
#[must_use]
pub fn get_at<'a>(root: &'a Value, path: &PropertyPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| child(node, segment))
}

/// Mutable counterpart of [`get_at`].
#[must_use]
pub fn get_at_mut<'a>(root: &'a mut Value, path: &PropertyPath) -> Option<&'a mut Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| child_mut(node, segment))
}

/// Numeric segment of an array write, if padding can reach it.
///
/// An index may extend the array by at most its current length, so a
/// huge segment cannot trigger an unbounded allocation.
fn writable_index(items: &[Value], segment: &str) -> Option<usize> {
    array_index(segment).filter(|index| *index <= items.len().saturating_mul(2))
}

/// Ensure `node` can hold `segment` and return the slot for it.
///
/// Objects gain the key on demand. Arrays accept a numeric index within
/// [`writable_index`] reach, padding with `null` past the end. Anything
/// else, including an array addressed by a non-numeric or out-of-reach
/// segment, is replaced with an empty object first.
#[expect(
    clippy::indexing_slicing,
    reason = "the array is resized to cover `index` before it is indexed"
)]
fn slot<'a>(node: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = match &*node {
        Value::Array(items) => writable_index(items, segment),
        _ => None,
    };
    match (node, index) {
        (Value::Array(items), Some(index)) => {
            if index >= items.len() {
                items.resize(index.saturating_add(1), Value::Null);
            }
            &mut items[index]
        }
        (Value::Object(map), _) => map.entry(segment.to_owned()).or_insert(Value::Null),
        (other, _) => {
            *other = Value::Object(Map::new());
            slot(other, segment)
        }
    }
}

/// Set `value` at `path`, creating intermediate objects as required.
///
/// # Examples
///
/// ```
/// use prop_loader::path::{set_at, PropertyPath};
/// use serde_json::json;
///
/// let mut tree = json!({});
/// set_at(&mut tree, &PropertyPath::parse("a.b")?, json!(1));
/// assert_eq!(tree, json!({"a": {"b": 1}}));
/// # Ok::<_, std::sync::Arc<prop_loader::PropError>>(())
/// ```
pub fn set_at(root: &mut Value, path: &PropertyPath, value: Value) {
    let target = path
        .segments()
        .iter()
        .fold(root, |node, segment| slot(node, segment));
    *target = value;
}

/// Remove and return the value at `path`.
///
/// Removing an array element shifts the remaining elements down.
pub fn remove_at(root: &mut Value, path: &PropertyPath) -> Option<Value> {
    let (last, parents) = path.segments().split_last()?;
    let parent = parents
        .iter()
        .try_fold(root, |node, segment| child_mut(node, segment))?;
    match parent {
        Value::Object(map) => map.remove(last),
        Value::Array(items) => {
            let index = array_index(last).filter(|index| *index < items.len())?;
            Some(items.remove(index))
        }
        _ => None,
    }
}
