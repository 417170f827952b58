//! Normalisation of the shapes a source's `load()` may return.

use std::future::Future;

use futures::stream::{self, BoxStream, Stream};
use futures::{FutureExt, StreamExt, TryStreamExt, future};

use crate::{Properties, SourceError};

/// Uniform representation every source result is normalised into.
pub type SourceStream = BoxStream<'static, Result<Properties, SourceError>>;

/// What a source's `load()` produced.
pub enum SourceLoad {
    /// A single, already available batch.
    Value(Properties),
    /// A finite, already available sequence of batches.
    Values(Vec<Properties>),
    /// A batch that becomes available later.
    Future(future::BoxFuture<'static, Result<Properties, SourceError>>),
    /// Any number of batches over time; may never complete.
    Stream(SourceStream),
    /// `load()` failed before producing anything.
    Failed(SourceError),
}

impl SourceLoad {
    /// Wrap a one-shot asynchronous load.
    pub fn future<F, E>(load: F) -> Self
    where
        F: Future<Output = Result<Properties, E>> + Send + 'static,
        E: Into<SourceError> + 'static,
    {
        Self::Future(load.map(|result| result.map_err(Into::into)).boxed())
    }

    /// Wrap a multi-emission asynchronous load.
    pub fn stream<S, E>(batches: S) -> Self
    where
        S: Stream<Item = Result<Properties, E>> + Send + 'static,
        E: Into<SourceError> + 'static,
    {
        Self::Stream(batches.map_err(Into::into).boxed())
    }

    /// Report a failure that happened before loading started.
    pub fn failed(error: impl Into<SourceError>) -> Self {
        Self::Failed(error.into())
    }

    /// Normalise into a single stream of batches.
    ///
    /// A failure ends the stream: nothing after the first `Err` is read.
    #[must_use]
    pub fn into_stream(self) -> SourceStream {
        match self {
            Self::Value(value) => stream::once(future::ready(Ok(value))).boxed(),
            Self::Values(values) => stream::iter(values.into_iter().map(Ok)).boxed(),
            Self::Future(load) => load.into_stream().boxed(),
            Self::Stream(batches) => batches,
            Self::Failed(error) => stream::once(future::ready(Err(error))).boxed(),
        }
    }
}

impl std::fmt::Debug for SourceLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Values(values) => f.debug_tuple("Values").field(values).finish(),
            Self::Future(_) => f.write_str("Future(..)"),
            Self::Stream(_) => f.write_str("Stream(..)"),
            Self::Failed(error) => f.debug_tuple("Failed").field(error).finish(),
        }
    }
}

impl From<Properties> for SourceLoad {
    fn from(value: Properties) -> Self {
        Self::Value(value)
    }
}

impl From<Vec<Properties>> for SourceLoad {
    fn from(values: Vec<Properties>) -> Self {
        Self::Values(values)
    }
}
