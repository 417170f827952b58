//! The source contract and the built-in source implementations.
//!
//! A [`PropertySource`] pairs a declarative [`SourceOptions`] descriptor with
//! a `load()` method. Whatever shape `load()` returns (one value, a list, a
//! one-shot future or a stream) is normalised by [`SourceLoad::into_stream`]
//! before the loader dispatches it.

mod env;
mod file;
mod load;
mod options;
mod simple;

use std::borrow::Cow;

pub use env::EnvSource;
pub use file::FileSource;
pub use load::{SourceLoad, SourceStream};
pub use options::SourceOptions;
pub use simple::{FnSource, StaticSource};

/// One contributor of properties.
///
/// # Examples
///
/// ```rust
/// use prop_loader::{PropertySource, SourceLoad, SourceOptions};
/// use serde_json::json;
///
/// struct FeatureFlags;
///
/// impl PropertySource for FeatureFlags {
///     fn options(&self) -> SourceOptions {
///         SourceOptions::default().path("features").required_to_load(true)
///     }
///
///     fn load(&self) -> SourceLoad {
///         SourceLoad::future(async { Ok::<_, std::io::Error>(json!({"beta": true})) })
///     }
/// }
///
/// assert_eq!(FeatureFlags.name(), "FeatureFlags");
/// ```
pub trait PropertySource: Send + Sync {
    /// Diagnostic identifier; defaults to the implementing type's name.
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(short_type_name(std::any::type_name::<Self>()))
    }

    /// Scheduling and merge flags for this source.
    fn options(&self) -> SourceOptions {
        SourceOptions::default()
    }

    /// Start loading and return the batches this source will produce.
    fn load(&self) -> SourceLoad;
}

impl std::fmt::Debug for dyn PropertySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PropertySource").field(&self.name()).finish()
    }
}

/// Strip the module path and generic arguments from a type name.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
