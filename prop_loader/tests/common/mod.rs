//! Shared fixtures for loader integration tests.

use std::sync::Arc;
use std::time::Duration;

use prop_loader::{PropertyService, SourceOptions};
use prop_loader_test_helpers::store::RecordingStore;
use rstest::fixture;
use tokio::time::Instant;

/// Options for a required source.
pub fn required() -> SourceOptions {
    SourceOptions::default().required_to_load(true)
}

/// Options for a required source in the ordered lane.
pub fn required_in_order() -> SourceOptions {
    required().load_in_order(true)
}

/// A service over a store that records every write.
pub struct Recorded {
    pub store: Arc<RecordingStore>,
    pub service: PropertyService,
}

#[fixture]
pub fn recorded() -> Recorded {
    prop_loader_test_helpers::tracing::init();
    let store = RecordingStore::shared();
    let service = PropertyService::new(store.clone());
    Recorded { store, service }
}

/// Assert that `started` lies `expected_ms` of virtual time in the past.
pub fn assert_elapsed(started: Instant, expected_ms: u64) {
    let elapsed = started.elapsed();
    let expected = Duration::from_millis(expected_ms);
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(1),
        "expected {expected:?}, waited {elapsed:?}"
    );
}

/// Let every pending timer and task run.
pub async fn settle_background() {
    tokio::time::sleep(Duration::from_secs(1)).await;
}
