//! Reactive in-memory [`PropertyStore`] backed by a `tokio` watch channel.

use futures::StreamExt;
use futures::stream::{self, BoxStream};
use serde_json::{Map, Value};
use tokio::sync::watch;

use super::PropertyStore;
use crate::Properties;

/// In-memory store that notifies watchers of distinct snapshots.
///
/// # Examples
///
/// ```
/// use prop_loader::{MemoryStore, PropertyStore};
/// use serde_json::json;
///
/// let store = MemoryStore::new();
/// store.update(json!({"theme": "dark"}));
/// assert_eq!(store.get_all(), json!({"theme": "dark"}));
/// store.reset();
/// assert_eq!(store.get_all(), json!({}));
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    initial: Properties,
    sender: watch::Sender<Properties>,
}

impl MemoryStore {
    /// Create a store holding an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::with_initial(Value::Object(Map::new()))
    }

    /// Create a store whose initial (and reset) snapshot is `initial`.
    #[must_use]
    pub fn with_initial(initial: Properties) -> Self {
        let (sender, _receiver) = watch::channel(initial.clone());
        Self { initial, sender }
    }

    /// Number of live watchers.
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyStore for MemoryStore {
    fn get_all(&self) -> Properties {
        self.sender.borrow().clone()
    }

    fn update(&self, properties: Properties) {
        self.sender.send_if_modified(|current| {
            if *current == properties {
                false
            } else {
                *current = properties;
                true
            }
        });
    }

    fn reset(&self) {
        self.update(self.initial.clone());
    }

    fn watch(&self) -> BoxStream<'static, Properties> {
        let mut receiver = self.sender.subscribe();
        receiver.mark_changed();
        stream::unfold(receiver, |mut receiver| async move {
            receiver.changed().await.ok()?;
            let snapshot = receiver.borrow_and_update().clone();
            Some((snapshot, receiver))
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use serde_json::json;

    use super::MemoryStore;
    use crate::PropertyStore;

    #[tokio::test]
    async fn watch_yields_current_snapshot_first() {
        let store = MemoryStore::with_initial(json!({"a": 1}));
        let mut changes = store.watch();
        assert_eq!(changes.next().await, Some(json!({"a": 1})));
    }

    #[tokio::test]
    async fn watch_skips_identical_snapshots() {
        let store = MemoryStore::new();
        let mut changes = store.watch();
        assert_eq!(changes.next().await, Some(json!({})));

        store.update(json!({}));
        store.update(json!({"a": 1}));
        assert_eq!(changes.next().await, Some(json!({"a": 1})));

        store.update(json!({"a": 1}));
        store.update(json!({"a": 2}));
        assert_eq!(changes.next().await, Some(json!({"a": 2})));
    }

    #[test]
    fn reset_restores_initial_snapshot() {
        let store = MemoryStore::with_initial(json!({"seed": true}));
        store.update(json!({"other": 1}));
        store.reset();
        assert_eq!(store.get_all(), json!({"seed": true}));
    }

    #[test]
    fn updates_apply_without_watchers() {
        let store = MemoryStore::new();
        assert_eq!(store.watcher_count(), 0);
        store.update(json!({"k": "v"}));
        assert_eq!(store.get_all(), json!({"k": "v"}));
    }
}
