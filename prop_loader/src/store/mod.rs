//! Storage contract for the authoritative property snapshot.
//!
//! The loader never chooses a storage technology; it only needs the four
//! operations on [`PropertyStore`]. [`MemoryStore`] is the reactive
//! in-memory implementation used by default.

mod memory;

use std::sync::Arc;

use futures::stream::BoxStream;

use crate::Properties;

pub use memory::MemoryStore;

/// Minimal contract a backing store must satisfy.
///
/// Writes are full-snapshot replacements; consumers never observe a partial
/// in-place mutation.
pub trait PropertyStore: Send + Sync {
    /// Returns a copy of the current snapshot.
    fn get_all(&self) -> Properties;

    /// Replaces the snapshot with `properties`.
    fn update(&self, properties: Properties);

    /// Restores the empty or initial snapshot.
    fn reset(&self);

    /// Live view of the snapshot.
    ///
    /// The stream yields the current snapshot first, then every later
    /// snapshot that differs from the previous one by deep equality.
    fn watch(&self) -> BoxStream<'static, Properties>;
}

/// Shared, dynamically dispatched store handle.
pub type SharedStore = Arc<dyn PropertyStore>;
