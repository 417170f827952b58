//! Placeholder substitution for string properties.

use regex::{Captures, Regex};
use serde::Deserialize;
use serde_json::Value;

use crate::path::{PropertyPath, get_at};
use crate::{PropError, PropResult};

/// Delimiters and lookup policy for
/// [`PropertyQuery::get_transpiled_property`](crate::PropertyQuery::get_transpiled_property).
///
/// A token is `start`, optional whitespace, a dotted property path,
/// optional whitespace and `end`, as in `{{ api.host }}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Opening delimiter.
    pub start: String,
    /// Closing delimiter.
    pub end: String,
    /// Resolve tokens against the live store when no context is supplied.
    pub use_store: bool,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            start: String::from("{{"),
            end: String::from("}}"),
            use_store: false,
        }
    }
}

impl InterpolationConfig {
    /// Use `start` and `end` as delimiters.
    #[must_use]
    pub fn delimiters(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = start.into();
        self.end = end.into();
        self
    }

    /// Sets [`InterpolationConfig::use_store`].
    #[must_use]
    pub const fn use_store(mut self, value: bool) -> Self {
        self.use_store = value;
        self
    }

    pub(crate) fn pattern(&self) -> PropResult<Regex> {
        let pattern = format!(
            r"{}\s*(.+?)\s*{}",
            regex::escape(&self.start),
            regex::escape(&self.end)
        );
        if self.start.is_empty() || self.end.is_empty() {
            return Err(PropError::Interpolation {
                pattern,
                message: String::from("delimiters must not be empty"),
            }
            .shared());
        }
        Regex::new(&pattern).map_err(|e| {
            PropError::Interpolation {
                message: e.to_string(),
                pattern,
            }
            .shared()
        })
    }
}

/// Replace every token in the strings of `value` with the value found in
/// `context`; tokens that resolve to nothing are kept as written.
pub(crate) fn interpolate(value: Value, pattern: &Regex, context: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(substitute(&text, pattern, context)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| interpolate(item, pattern, context))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, item)| (key, interpolate(item, pattern, context)))
                .collect(),
        ),
        other => other,
    }
}

fn substitute(text: &str, pattern: &Regex, context: &Value) -> String {
    pattern
        .replace_all(text, |caps: &Captures<'_>| {
            let token = caps.get(0).map_or("", |m| m.as_str());
            caps.get(1)
                .and_then(|key| PropertyPath::parse(key.as_str()).ok())
                .and_then(|path| get_at(context, &path))
                .map_or_else(|| token.to_owned(), render)
        })
        .into_owned()
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
