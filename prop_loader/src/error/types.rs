//! Primary error enum for property loading flows.

use std::time::Duration;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Boxed error returned by a property source's `load()` sequence.
///
/// Sources wrap their own failures (HTTP clients, parsers, timers) in this
/// type so the loader can report them without knowing their concrete type.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while loading, mutating or reading properties.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PropError {
    /// A path argument was empty or contained an empty segment.
    #[error("invalid property path '{path}': {reason}")]
    InvalidPath {
        /// Path as supplied by the caller.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },

    /// A source failed while producing its properties.
    ///
    /// This is the diagnostic form of a failure. It is logged, never
    /// returned from a load session.
    #[error("property source '{source_name}' failed to load: {source}")]
    SourceLoad {
        /// Diagnostic name of the failing source.
        source_name: String,
        /// Underlying error reported by the source.
        #[source]
        source: SourceError,
    },

    /// A required source failed before the session resolved.
    #[error(
        "required property source '{source_name}' failed to load{}",
        detail(.message.as_deref())
    )]
    RequiredSource {
        /// Diagnostic name of the failing source.
        source_name: String,
        /// Message of the original failure, when it carried one.
        message: Option<String>,
    },

    /// The session was destroyed before it resolved or rejected.
    #[error("property load session was destroyed before it settled")]
    Cancelled,

    /// The session did not settle within the configured maximum load time.
    #[error("property loading did not settle within {elapsed:?}")]
    LoadTimeout {
        /// Configured maximum load time that elapsed.
        elapsed: Duration,
    },

    /// A property value could not be converted to the requested type.
    #[error("cannot convert property at '{path}': {message}")]
    Conversion {
        /// Path of the property being converted.
        path: String,
        /// Human-readable explanation of the conversion failure.
        message: String,
    },

    /// Error originating from a property file.
    #[error("property file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying error reported while reading or parsing the file.
        #[source]
        source: SourceError,
    },

    /// Error while gathering properties from a figment provider.
    #[error("failed to gather properties: {0}")]
    Gathering(#[from] Box<figment::Error>),

    /// Interpolation delimiters could not be compiled into a pattern.
    #[error("invalid interpolation pattern '{pattern}': {message}")]
    Interpolation {
        /// Pattern built from the configured delimiters.
        pattern: String,
        /// Why the pattern was rejected.
        message: String,
    },
}

fn detail(message: Option<&str>) -> String {
    message
        .filter(|text| !text.is_empty())
        .map(|text| format!(": {text}"))
        .unwrap_or_default()
}
