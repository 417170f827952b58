//! Pure functions that combine a loaded batch with the current snapshot.
//!
//! Two strategies exist:
//!
//! - [`merge`] recursively overlays the batch: objects merge key-wise,
//!   arrays concatenate, everything else is replaced by the later value.
//! - [`overwrite`] shallowly replaces the target location, without
//!   recursing. At the root it assigns the batch's top-level keys.
//!
//! Both accept an optional [`PropertyPath`] under which the batch is
//! applied; `None` targets the root. A merge never erases a value the
//! batch does not mention.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{Properties, path::PropertyPath, path::get_at_mut, path::set_at};

/// How a source's batch is applied to the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Shallow replacement of the top-level keys at the target location.
    #[default]
    Overwrite,
    /// Recursive deep merge.
    Merge,
}

/// Apply `incoming` to `current` using `strategy`.
#[must_use]
pub fn apply(
    strategy: MergeStrategy,
    current: Properties,
    incoming: Properties,
    path: Option<&PropertyPath>,
) -> Properties {
    match strategy {
        MergeStrategy::Merge => merge(current, incoming, path),
        MergeStrategy::Overwrite => overwrite(current, incoming, path),
    }
}

/// Deep-merge `incoming` into `current` at `path`.
///
/// # Examples
///
/// ```rust
/// use prop_loader::merge::merge;
/// use prop_loader::PropertyPath;
/// use serde_json::json;
///
/// let path = PropertyPath::parse("feature")?;
/// let once = merge(json!({}), json!({"a": [0]}), Some(&path));
/// let twice = merge(once, json!({"a": [1]}), Some(&path));
/// assert_eq!(twice, json!({"feature": {"a": [0, 1]}}));
/// # Ok::<_, std::sync::Arc<prop_loader::PropError>>(())
/// ```
#[must_use]
pub fn merge(
    mut current: Properties,
    incoming: Properties,
    path: Option<&PropertyPath>,
) -> Properties {
    match path {
        None => merge_value(&mut current, incoming),
        Some(path) => match get_at_mut(&mut current, path) {
            Some(target) => merge_value(target, incoming),
            None => set_at(&mut current, path, incoming),
        },
    }
    current
}

/// Shallowly overwrite `current` with `incoming`.
///
/// With a `path`, whatever sits there is replaced by `incoming`. At the root,
/// each top-level key of an object `incoming` replaces the matching entry
/// wholesale and other root keys survive.
///
/// # Examples
///
/// ```rust
/// use prop_loader::merge::overwrite;
/// use prop_loader::PropertyPath;
/// use serde_json::json;
///
/// let current = json!({"db": {"host": "a", "port": 1}, "name": "x"});
/// let next = overwrite(current, json!({"db": {"host": "b"}}), None);
/// assert_eq!(next, json!({"db": {"host": "b"}, "name": "x"}));
///
/// let scoped = overwrite(next, json!({"port": 2}), Some(&PropertyPath::parse("db")?));
/// assert_eq!(scoped, json!({"db": {"port": 2}, "name": "x"}));
/// # Ok::<_, std::sync::Arc<prop_loader::PropError>>(())
/// ```
#[must_use]
pub fn overwrite(
    mut current: Properties,
    incoming: Properties,
    path: Option<&PropertyPath>,
) -> Properties {
    match path {
        None => assign(&mut current, incoming),
        Some(path) => set_at(&mut current, path, incoming),
    }
    current
}

/// Deep-merge every batch in `batches` left to right, starting from `{}`.
///
/// Later batches win on scalar conflicts.
#[must_use]
pub fn merge_all<I>(batches: I) -> Properties
where
    I: IntoIterator<Item = Properties>,
{
    batches
        .into_iter()
        .fold(Value::Object(Map::new()), |acc, batch| merge(acc, batch, None))
}

/// Overlay `layer` onto `target`, updating `target` in place.
///
/// Behaviour:
/// - Objects are merged recursively: new keys are added and shared keys are
///   merged again one level down.
/// - Arrays concatenate, keeping duplicates.
/// - Any other pairing replaces `target` with `layer`.
///
/// # Examples
///
/// ```rust
/// use prop_loader::merge::merge_value;
/// use serde_json::json;
///
/// let mut acc = json!({"a": 1, "b": {"x": 1}, "tags": ["x"]});
/// merge_value(&mut acc, json!({"b": {"y": 2}, "c": 3, "tags": ["x"]}));
/// assert_eq!(acc, json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3, "tags": ["x", "x"]}));
/// ```
pub fn merge_value(target: &mut Value, layer: Value) {
    match (target, layer) {
        (Value::Object(target_map), Value::Object(map)) => merge_object(target_map, map),
        (Value::Array(items), Value::Array(more)) => items.extend(more),
        (target, layer) => *target = layer,
    }
}

fn merge_object(target_map: &mut Map<String, Value>, map: Map<String, Value>) {
    for (key, value) in map {
        match target_map.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target_map.insert(key, value);
            }
        }
    }
}

fn assign(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(target_map), Value::Object(map)) => target_map.extend(map),
        (target, incoming) => *target = incoming,
    }
}
