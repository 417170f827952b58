//! Path-aware mutation primitives over a [`PropertyStore`].
//!
//! Every primitive reads a snapshot with [`PropertyStore::get_all`],
//! computes the next full snapshot and writes it back with
//! [`PropertyStore::update`]. No-op mutations skip the write entirely.
//!
//! [`PropertyStore`]: crate::store::PropertyStore
//! [`PropertyStore::get_all`]: crate::store::PropertyStore::get_all
//! [`PropertyStore::update`]: crate::store::PropertyStore::update

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::merge::{self, MergeStrategy};
use crate::path::{IntoPropertyPath, PropertyPath, get_at, remove_at, set_at};
use crate::store::{MemoryStore, SharedStore};
use crate::{PropResult, Properties};

/// Applies merges and path mutations to a shared store.
#[derive(Clone)]
pub struct PropertyService {
    store: SharedStore,
}

impl std::fmt::Debug for PropertyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyService")
            .field("store", &"<dyn PropertyStore>")
            .finish()
    }
}

impl PropertyService {
    /// Wrap an existing store.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Create a service over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn properties(&self) -> Properties {
        self.store.get_all()
    }

    /// Set `value` at `path` only when nothing is defined there yet.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PropError::InvalidPath`] for a malformed path.
    ///
    /// # Examples
    ///
    /// ```
    /// use prop_loader::PropertyService;
    /// use serde_json::json;
    ///
    /// let service = PropertyService::in_memory();
    /// service.create("a.b", json!(1))?;
    /// service.create("a.b", json!(2))?;
    /// assert_eq!(service.properties(), json!({"a": {"b": 1}}));
    /// assert!(service.create("", json!(1)).is_err());
    /// # Ok::<_, std::sync::Arc<prop_loader::PropError>>(())
    /// ```
    pub fn create(&self, path: impl IntoPropertyPath, value: Value) -> PropResult<()> {
        let path = path.into_property_path()?;
        self.mutate(|snapshot| {
            if get_at(snapshot, &path).is_some() {
                return false;
            }
            set_at(snapshot, &path, value);
            true
        });
        Ok(())
    }

    /// Replace the value at `path` only when one is already defined.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PropError::InvalidPath`] for a malformed path.
    pub fn update(&self, path: impl IntoPropertyPath, value: Value) -> PropResult<()> {
        let path = path.into_property_path()?;
        self.mutate(|snapshot| {
            if get_at(snapshot, &path).is_none() {
                return false;
            }
            set_at(snapshot, &path, value);
            true
        });
        Ok(())
    }

    /// Set `value` at `path` unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PropError::InvalidPath`] for a malformed path.
    pub fn upsert(&self, path: impl IntoPropertyPath, value: Value) -> PropResult<()> {
        let path = path.into_property_path()?;
        self.mutate(|snapshot| {
            set_at(snapshot, &path, value);
            true
        });
        Ok(())
    }

    /// Remove whatever is defined at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PropError::InvalidPath`] for a malformed path.
    pub fn delete(&self, path: impl IntoPropertyPath) -> PropResult<()> {
        let path = path.into_property_path()?;
        self.mutate(|snapshot| remove_at(snapshot, &path).is_some());
        Ok(())
    }

    /// Append `value` to the array at `path`, creating `[value]` if undefined.
    ///
    /// A defined non-array value is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PropError::InvalidPath`] for a malformed path.
    pub fn add(&self, path: impl IntoPropertyPath, value: Value) -> PropResult<()> {
        let path = path.into_property_path()?;
        self.mutate(|snapshot| match crate::path::get_at_mut(snapshot, &path) {
            Some(Value::Array(items)) => {
                items.push(value);
                true
            }
            Some(_) => {
                warn!(path = %path, "cannot add to a property that is not an array");
                false
            }
            None => {
                set_at(snapshot, &path, Value::Array(vec![value]));
                true
            }
        });
        Ok(())
    }

    /// Deep-merge `properties` into the store at `path`.
    pub fn merge(&self, properties: Properties, path: Option<&PropertyPath>) {
        self.apply(MergeStrategy::Merge, properties, path);
    }

    /// Shallowly overwrite the store at `path` with `properties`.
    pub fn overwrite(&self, properties: Properties, path: Option<&PropertyPath>) {
        self.apply(MergeStrategy::Overwrite, properties, path);
    }

    /// Apply `properties` using `strategy`.
    pub fn apply(
        &self,
        strategy: MergeStrategy,
        properties: Properties,
        path: Option<&PropertyPath>,
    ) {
        let next = merge::apply(strategy, self.store.get_all(), properties, path);
        self.store.update(next);
    }

    /// Restore the store's initial snapshot.
    pub fn reset(&self) {
        debug!("resetting property store");
        self.store.reset();
    }

    fn mutate<F>(&self, change: F)
    where
        F: FnOnce(&mut Properties) -> bool,
    {
        let mut snapshot = self.store.get_all();
        if change(&mut snapshot) {
            self.store.update(snapshot);
        }
    }
}

#[cfg(test)]
mod tests;
