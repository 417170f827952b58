//! A [`PropertyStore`] that remembers every call made to it.

use std::sync::Arc;

use futures::stream::BoxStream;
use parking_lot::Mutex;
use prop_loader::{MemoryStore, Properties, PropertyStore};

/// One write observed by a [`RecordingStore`].
#[derive(Clone, Debug, PartialEq)]
pub enum StoreCall {
    /// `update` with the full snapshot written.
    Update(Properties),
    /// `reset`.
    Reset,
}

/// Wraps a [`MemoryStore`] and records `update` and `reset` calls.
///
/// # Examples
///
/// ```
/// use prop_loader::{PropertyService, PropertyStore};
/// use prop_loader_test_helpers::store::RecordingStore;
/// use serde_json::json;
///
/// let store = RecordingStore::shared();
/// let service = PropertyService::new(store.clone());
/// service.upsert("a", json!(1)).expect("valid path");
/// assert_eq!(store.updates(), vec![json!({"a": 1})]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<StoreCall>>,
}

impl RecordingStore {
    /// Create an empty recording store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty recording store behind an [`Arc`].
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    /// The snapshots passed to `update`, in order.
    #[must_use]
    pub fn updates(&self) -> Vec<Properties> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                StoreCall::Update(snapshot) => Some(snapshot.clone()),
                StoreCall::Reset => None,
            })
            .collect()
    }

    /// Number of `update` and `reset` calls.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl PropertyStore for RecordingStore {
    fn get_all(&self) -> Properties {
        self.inner.get_all()
    }

    fn update(&self, properties: Properties) {
        self.calls.lock().push(StoreCall::Update(properties.clone()));
        self.inner.update(properties);
    }

    fn reset(&self) {
        self.calls.lock().push(StoreCall::Reset);
        self.inner.reset();
    }

    fn watch(&self) -> BoxStream<'static, Properties> {
        self.inner.watch()
    }
}
