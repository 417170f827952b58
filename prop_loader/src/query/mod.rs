//! Read-side access to the property store.
//!
//! [`PropertyQuery`] never mutates the store. Lookups that receive a
//! malformed path log a warning and behave as if nothing was found.

mod interpolate;

use futures::stream::BoxStream;
use futures::{StreamExt, future};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::path::{IntoPropertyPath, PropertyPath, get_at};
use crate::{PropError, PropResult, Properties, PropertyService, SharedStore};

pub use interpolate::InterpolationConfig;

/// Reads values out of a [`PropertyStore`](crate::PropertyStore).
///
/// # Examples
///
/// ```
/// use prop_loader::{InterpolationConfig, PropertyQuery, PropertyService};
/// use serde_json::json;
///
/// let service = PropertyService::in_memory();
/// service.upsert("api", json!({"host": "example.org", "greeting": "hello {{ user }}"}))?;
/// let query = PropertyQuery::for_service(&service);
///
/// assert_eq!(query.get_property("api.host"), Some(json!("example.org")));
/// assert_eq!(query.get_required_property("api.port", json!(443)), json!(443));
/// let greeting = query.get_transpiled_property(
///     "api.greeting",
///     Some(&json!({"user": "ada"})),
///     &InterpolationConfig::default(),
/// )?;
/// assert_eq!(greeting, Some(json!("hello ada")));
/// # Ok::<_, std::sync::Arc<prop_loader::PropError>>(())
/// ```
#[derive(Clone)]
pub struct PropertyQuery {
    store: SharedStore,
}

impl std::fmt::Debug for PropertyQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyQuery").finish_non_exhaustive()
    }
}

impl PropertyQuery {
    /// Query `store`.
    #[must_use]
    pub const fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Query the store behind `service`.
    #[must_use]
    pub fn for_service(service: &PropertyService) -> Self {
        Self::new(service.store().clone())
    }

    /// Returns the whole snapshot.
    #[must_use]
    pub fn get_properties(&self) -> Properties {
        self.store.get_all()
    }

    /// Returns the value at `path`, if any.
    #[must_use]
    pub fn get_property(&self, path: impl IntoPropertyPath) -> Option<Value> {
        let path = PropertyPath::lenient(path)?;
        get_at(&self.store.get_all(), &path).cloned()
    }

    /// Returns the value at `path`, or `default` when it is absent or null.
    #[must_use]
    pub fn get_required_property(&self, path: impl IntoPropertyPath, default: Value) -> Value {
        self.get_property(path)
            .filter(|value| !value.is_null())
            .unwrap_or(default)
    }

    /// Returns the value at `path` passed through `convert`.
    #[must_use]
    pub fn get_typed_property<T>(
        &self,
        path: impl IntoPropertyPath,
        convert: impl FnOnce(Value) -> T,
    ) -> Option<T> {
        self.get_property(path).map(convert)
    }

    /// Deserialise the value at `path` into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`PropError::InvalidPath`] for a malformed path and
    /// [`PropError::Conversion`] when the value does not fit `T`.
    pub fn get_property_as<T: DeserializeOwned>(
        &self,
        path: impl IntoPropertyPath,
    ) -> PropResult<Option<T>> {
        let path = path.into_property_path()?;
        let Some(value) = get_at(&self.store.get_all(), &path).cloned() else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| PropError::conversion(path.to_string(), e.to_string()).shared())
    }

    /// Returns the value at `path` with placeholders substituted.
    ///
    /// Tokens resolve against `context`, or against the current snapshot
    /// when no context is given and [`InterpolationConfig::use_store`] is
    /// set. Strings nested in arrays and objects are substituted too.
    ///
    /// # Errors
    ///
    /// Returns [`PropError::Interpolation`] when the delimiters are empty.
    pub fn get_transpiled_property(
        &self,
        path: impl IntoPropertyPath,
        context: Option<&Value>,
        config: &InterpolationConfig,
    ) -> PropResult<Option<Value>> {
        let pattern = config.pattern()?;
        let Some(value) = self.get_property(path) else {
            return Ok(None);
        };
        let snapshot;
        let context = match context {
            Some(context) => context,
            None if config.use_store => {
                snapshot = self.store.get_all();
                &snapshot
            }
            None => {
                warn!("interpolating without a context; tokens are left unresolved");
                snapshot = Value::Null;
                &snapshot
            }
        };
        Ok(Some(interpolate::interpolate(value, &pattern, context)))
    }

    /// Stream the value at `path`, starting with the current one and then
    /// every time it changes.
    ///
    /// # Errors
    ///
    /// Returns [`PropError::InvalidPath`] for a malformed path.
    pub fn watch_property(
        &self,
        path: impl IntoPropertyPath,
    ) -> PropResult<BoxStream<'static, Option<Value>>> {
        let path = path.into_property_path()?;
        let mut last: Option<Option<Value>> = None;
        Ok(self
            .store
            .watch()
            .map(move |snapshot| get_at(&snapshot, &path).cloned())
            .filter_map(move |value| {
                let changed = last.as_ref() != Some(&value);
                if changed {
                    last = Some(value.clone());
                }
                future::ready(changed.then_some(value))
            })
            .boxed())
    }
}
