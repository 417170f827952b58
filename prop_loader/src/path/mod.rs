//! Addresses into a [`Properties`](crate::Properties) tree.
//!
//! A path is either a dot-delimited string (`"a.b.c"`) or a list of
//! segments (`["a", "b", "c"]`). Both forms normalise to [`PropertyPath`].
//! A path with no segments, or with any empty segment, is invalid.

mod access;

use std::fmt;

use crate::{PropError, PropResult};

pub use access::{get_at, get_at_mut, remove_at, set_at};

/// Validated, non-empty sequence of path segments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    /// Parse a dot-delimited path.
    ///
    /// # Errors
    ///
    /// Returns [`PropError::InvalidPath`] when `path` is empty or contains an
    /// empty segment (for example `"a..b"` or `"a."`).
    ///
    /// # Examples
    ///
    /// ```
    /// use prop_loader::PropertyPath;
    /// let path = PropertyPath::parse("server.port")?;
    /// assert_eq!(path.segments(), ["server", "port"]);
    /// assert!(PropertyPath::parse("server..port").is_err());
    /// # Ok::<_, std::sync::Arc<prop_loader::PropError>>(())
    /// ```
    pub fn parse(path: &str) -> PropResult<Self> {
        if path.is_empty() {
            return Err(PropError::invalid_path(path, "path is empty").shared());
        }
        Self::validated(path, path.split('.').map(str::to_owned).collect())
    }

    /// Build a path from individual segments.
    ///
    /// # Errors
    ///
    /// Returns [`PropError::InvalidPath`] when no segments are supplied or any
    /// segment is empty.
    pub fn from_segments<I, S>(segments: I) -> PropResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        let display = segments.join(".");
        Self::validated(&display, segments)
    }

    /// Parse `path`, logging and discarding it when invalid.
    ///
    /// Looser call sites (source descriptors, merge targets) fall back to the
    /// root of the tree instead of failing.
    #[must_use]
    pub fn lenient(path: impl IntoPropertyPath) -> Option<Self> {
        match path.into_property_path() {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring invalid property path; using the root");
                None
            }
        }
    }

    fn validated(display: &str, segments: Vec<String>) -> PropResult<Self> {
        if segments.is_empty() {
            return Err(PropError::invalid_path(display, "path has no segments").shared());
        }
        if let Some(index) = segments.iter().position(String::is_empty) {
            return Err(PropError::invalid_path(
                display,
                format!("segment {} is empty", index + 1),
            )
            .shared());
        }
        Ok(Self { segments })
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of segments.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`; a valid path has at least one segment.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a new path with `segment` appended.
    ///
    /// # Errors
    ///
    /// Returns [`PropError::InvalidPath`] when `segment` is empty.
    pub fn join(&self, segment: &str) -> PropResult<Self> {
        let mut segments = self.segments.clone();
        segments.push(segment.to_owned());
        Self::from_segments(segments)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl std::str::FromStr for PropertyPath {
    type Err = std::sync::Arc<PropError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Conversion into a validated [`PropertyPath`].
///
/// Implemented for dot-delimited strings, segment lists and existing paths
/// so every path-taking API accepts either form.
pub trait IntoPropertyPath {
    /// Validate and convert `self`.
    ///
    /// # Errors
    ///
    /// Returns [`PropError::InvalidPath`] for empty paths or empty segments.
    fn into_property_path(self) -> PropResult<PropertyPath>;
}

impl IntoPropertyPath for PropertyPath {
    fn into_property_path(self) -> PropResult<PropertyPath> {
        Ok(self)
    }
}

impl IntoPropertyPath for &PropertyPath {
    fn into_property_path(self) -> PropResult<PropertyPath> {
        Ok(self.clone())
    }
}

impl IntoPropertyPath for &str {
    fn into_property_path(self) -> PropResult<PropertyPath> {
        PropertyPath::parse(self)
    }
}

impl IntoPropertyPath for String {
    fn into_property_path(self) -> PropResult<PropertyPath> {
        PropertyPath::parse(&self)
    }
}

impl IntoPropertyPath for &String {
    fn into_property_path(self) -> PropResult<PropertyPath> {
        PropertyPath::parse(self)
    }
}

impl IntoPropertyPath for &[&str] {
    fn into_property_path(self) -> PropResult<PropertyPath> {
        PropertyPath::from_segments(self.iter().copied())
    }
}

impl IntoPropertyPath for &[String] {
    fn into_property_path(self) -> PropResult<PropertyPath> {
        PropertyPath::from_segments(self.iter().cloned())
    }
}

impl IntoPropertyPath for Vec<String> {
    fn into_property_path(self) -> PropResult<PropertyPath> {
        PropertyPath::from_segments(self)
    }
}

impl IntoPropertyPath for Vec<&str> {
    fn into_property_path(self) -> PropResult<PropertyPath> {
        PropertyPath::from_segments(self)
    }
}

impl<const N: usize> IntoPropertyPath for [&str; N] {
    fn into_property_path(self) -> PropResult<PropertyPath> {
        PropertyPath::from_segments(self)
    }
}

#[cfg(test)]
mod tests;
