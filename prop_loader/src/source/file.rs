//! Source that reads a JSON or TOML property file.

use std::borrow::Cow;

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Format, Json, Toml};

use super::{PropertySource, SourceLoad, SourceOptions};
use crate::{IntoSourceError, PropError, PropResult, Properties};

/// Loads properties from a file, choosing the parser from its extension.
///
/// `.json` files are parsed as JSON; everything else is parsed as TOML.
/// The file is read asynchronously each time the source is loaded, and a
/// missing or unreadable file is reported as a load failure.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: Utf8PathBuf,
    options: SourceOptions,
}

impl FileSource {
    /// Create a source for `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: SourceOptions::default(),
        }
    }

    /// Replace the source's options.
    #[must_use]
    pub fn with_options(mut self, options: SourceOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Read and parse the file.
    ///
    /// # Errors
    ///
    /// Returns [`PropError::File`] when the file cannot be read or parsed.
    pub async fn read(&self) -> PropResult<Properties> {
        read_file(self.path.clone()).await
    }
}

async fn read_file(path: Utf8PathBuf) -> PropResult<Properties> {
    let data = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| PropError::file(&path, e).shared())?;
    parse_by_format(&path, &data)
}

/// Parse file contents according to the file extension.
pub(crate) fn parse_by_format(path: &Utf8Path, data: &str) -> PropResult<Properties> {
    let ext = path.extension().map(str::to_ascii_lowercase);
    let figment = match ext.as_deref() {
        Some("json") => Figment::from(Json::string(data)),
        _ => {
            // Validate TOML first so parse failures carry this file's context
            // before Figment performs its own pass via `Toml::string`.
            toml::from_str::<toml::Value>(data).map_err(|e| PropError::file(path, e).shared())?;
            Figment::from(Toml::string(data))
        }
    };
    figment
        .extract::<Properties>()
        .map_err(|e| PropError::file(path, e).shared())
}

impl PropertySource for FileSource {
    fn name(&self) -> Cow<'_, str> {
        Cow::Owned(format!("FileSource({})", self.path))
    }

    fn options(&self) -> SourceOptions {
        self.options.clone()
    }

    fn load(&self) -> SourceLoad {
        let path = self.path.clone();
        SourceLoad::Future(Box::pin(async move { read_file(path).await.into_source_error() }))
    }
}
