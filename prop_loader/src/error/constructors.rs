//! Constructors and classification helpers for `PropError`.

use std::sync::Arc;

use camino::Utf8Path;

use super::{PropError, SourceError};

impl PropError {
    /// Construct an [`PropError::InvalidPath`].
    ///
    /// # Examples
    ///
    /// ```
    /// use prop_loader::PropError;
    /// let e = PropError::invalid_path("a..b", "segment 2 is empty");
    /// assert!(e.is_invalid_path());
    /// ```
    #[must_use]
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a source failure for diagnostics.
    #[must_use]
    pub fn source_load(source_name: impl Into<String>, source: SourceError) -> Self {
        Self::SourceLoad {
            source_name: source_name.into(),
            source,
        }
    }

    /// Build the rejection reported when a required source fails.
    ///
    /// The original error's message is carried along so callers see both
    /// the failing source and the reason in one line.
    ///
    /// # Examples
    ///
    /// ```
    /// use prop_loader::{PropError, SourceError};
    /// let cause: SourceError = "connection refused".into();
    /// let e = PropError::required_source("RemoteSource", &cause);
    /// assert_eq!(
    ///     e.to_string(),
    ///     "required property source 'RemoteSource' failed to load: connection refused"
    /// );
    /// ```
    #[must_use]
    pub fn required_source(source_name: impl Into<String>, cause: &SourceError) -> Self {
        Self::RequiredSource {
            source_name: source_name.into(),
            message: Some(cause.to_string()),
        }
    }

    /// Construct a file error for `path`.
    #[must_use]
    pub fn file(path: &Utf8Path, source: impl Into<SourceError>) -> Self {
        Self::File {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    /// Construct a gathering error from a [`figment::Error`].
    #[must_use]
    pub fn gathering(source: figment::Error) -> Self {
        Self::Gathering(Box::new(source))
    }

    /// Construct a conversion error for the property at `path`.
    #[must_use]
    pub fn conversion(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for [`PropError::InvalidPath`].
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath { .. })
    }

    /// Returns `true` when the session was destroyed before settling.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Name of the source responsible for this error, if any.
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        match self {
            Self::SourceLoad { source_name, .. } | Self::RequiredSource { source_name, .. } => {
                Some(source_name)
            }
            _ => None,
        }
    }

    /// Wrap `self` for use as a [`crate::PropResult`] error.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
