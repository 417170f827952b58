//! Sources backed by a fixed value or a closure.

use std::borrow::Cow;

use super::{PropertySource, SourceLoad, SourceOptions};
use crate::Properties;

/// Source that always yields the same batch.
#[derive(Clone, Debug)]
pub struct StaticSource {
    name: String,
    value: Properties,
    options: SourceOptions,
}

impl StaticSource {
    /// Create a static source named `name` yielding `value`.
    #[must_use]
    pub fn new(name: impl Into<String>, value: Properties) -> Self {
        Self {
            name: name.into(),
            value,
            options: SourceOptions::default(),
        }
    }

    /// Replace the source's options.
    #[must_use]
    pub fn with_options(mut self, options: SourceOptions) -> Self {
        self.options = options;
        self
    }
}

impl PropertySource for StaticSource {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn options(&self) -> SourceOptions {
        self.options.clone()
    }

    fn load(&self) -> SourceLoad {
        SourceLoad::Value(self.value.clone())
    }
}

/// Source whose `load()` delegates to a closure.
///
/// Useful for wrapping an HTTP client call or a timer without declaring a
/// dedicated type.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use prop_loader::{FnSource, SourceLoad, SourceOptions};
/// use serde_json::json;
///
/// let delayed = FnSource::new("delayed", || {
///     SourceLoad::future(async {
///         tokio::time::sleep(Duration::from_millis(5)).await;
///         Ok::<_, std::io::Error>(json!({"ready": true}))
///     })
/// })
/// .with_options(SourceOptions::default().required_to_load(true));
/// # let _ = delayed;
/// ```
pub struct FnSource<F> {
    name: String,
    load: F,
    options: SourceOptions,
}

impl<F> FnSource<F>
where
    F: Fn() -> SourceLoad + Send + Sync,
{
    /// Create a closure-backed source named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, load: F) -> Self {
        Self {
            name: name.into(),
            load,
            options: SourceOptions::default(),
        }
    }

    /// Replace the source's options.
    #[must_use]
    pub fn with_options(mut self, options: SourceOptions) -> Self {
        self.options = options;
        self
    }
}

impl<F> std::fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSource")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<F> PropertySource for FnSource<F>
where
    F: Fn() -> SourceLoad + Send + Sync,
{
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn options(&self) -> SourceOptions {
        self.options.clone()
    }

    fn load(&self) -> SourceLoad {
        (self.load)()
    }
}
