//! Source that collects prefixed environment variables.

use std::borrow::Cow;

use figment::Figment;
use figment::providers::Env;

use super::{PropertySource, SourceLoad, SourceOptions};
use crate::{PropResult, PropResultExt, Properties};

/// Reads environment variables starting with a prefix.
///
/// The prefix is stripped and keys are lower-cased. Keys are split on the
/// separator (`__` by default) to build nested properties, so
/// `APP_DB__HOST=db` becomes `{"db": {"host": "db"}}`. Values are parsed
/// as integers, floats or booleans where possible.
#[derive(Clone, Debug)]
pub struct EnvSource {
    prefix: String,
    separator: String,
    options: SourceOptions,
}

impl EnvSource {
    /// Create a source for variables starting with `prefix`.
    #[must_use]
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: String::from("__"),
            options: SourceOptions::default(),
        }
    }

    /// Use `separator` to nest keys.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Replace the source's options.
    #[must_use]
    pub fn with_options(mut self, options: SourceOptions) -> Self {
        self.options = options;
        self
    }

    /// Collect the current environment into properties.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PropError::Gathering`] if figment cannot extract the values.
    pub fn collect(&self) -> PropResult<Properties> {
        Figment::from(Env::prefixed(&self.prefix).split(self.separator.as_str()))
            .extract::<Properties>()
            .into_prop()
    }
}

impl PropertySource for EnvSource {
    fn name(&self) -> Cow<'_, str> {
        Cow::Owned(format!("EnvSource({})", self.prefix))
    }

    fn options(&self) -> SourceOptions {
        self.options.clone()
    }

    fn load(&self) -> SourceLoad {
        match self.collect() {
            Ok(properties) => SourceLoad::Value(properties),
            Err(err) => SourceLoad::failed(err),
        }
    }
}
