//! Unit tests for the property service primitives.

use std::sync::Arc;

use parking_lot::Mutex;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::PropertyService;
use crate::{MemoryStore, PropertyPath, PropertyStore};

/// Store that counts writes so no-op mutations can be asserted.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    writes: Mutex<usize>,
}

impl PropertyStore for CountingStore {
    fn get_all(&self) -> Value {
        self.inner.get_all()
    }

    fn update(&self, properties: Value) {
        *self.writes.lock() += 1;
        self.inner.update(properties);
    }

    fn reset(&self) {
        self.inner.reset();
    }

    fn watch(&self) -> futures::stream::BoxStream<'static, Value> {
        self.inner.watch()
    }
}

struct Harness {
    store: Arc<CountingStore>,
    service: PropertyService,
}

impl Harness {
    fn writes(&self) -> usize {
        *self.store.writes.lock()
    }
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(CountingStore::default());
    let service = PropertyService::new(store.clone());
    Harness { store, service }
}

#[rstest]
fn create_sets_nested_value_once(harness: Harness) {
    harness.service.create("a.b", json!(1)).expect("create");
    assert_eq!(harness.service.properties(), json!({"a": {"b": 1}}));
    harness.service.create("a.b", json!(2)).expect("create again");
    assert_eq!(harness.service.properties(), json!({"a": {"b": 1}}));
    assert_eq!(harness.writes(), 1);
}

#[rstest]
#[case("")]
#[case("a..b")]
fn primitives_reject_malformed_paths(harness: Harness, #[case] raw: &str) {
    let service = &harness.service;
    for result in [
        service.create(raw, json!(1)),
        service.update(raw, json!(1)),
        service.upsert(raw, json!(1)),
        service.delete(raw),
        service.add(raw, json!(1)),
    ] {
        let err = result.expect_err("malformed path must fail");
        assert!(err.is_invalid_path());
    }
    assert_eq!(harness.writes(), 0);
}

#[rstest]
fn update_requires_existing_value(harness: Harness) {
    harness.service.update("missing", json!(1)).expect("update");
    assert_eq!(harness.service.properties(), json!({}));
    harness.service.upsert("present", json!(null)).expect("upsert");
    harness.service.update("present", json!(2)).expect("update");
    assert_eq!(harness.service.properties(), json!({"present": 2}));
}

#[rstest]
fn upsert_accepts_segment_lists(harness: Harness) {
    harness.service.upsert(["x", "y"], json!("v")).expect("upsert");
    harness.service.upsert(vec!["x", "y"], json!("w")).expect("upsert");
    assert_eq!(harness.service.properties(), json!({"x": {"y": "w"}}));
}

#[rstest]
fn upsert_with_huge_index_does_not_grow_array(harness: Harness) {
    harness.service.upsert("list", json!([])).expect("upsert");
    harness
        .service
        .upsert("list.18446744073709551615", json!(1))
        .expect("upsert huge index");
    assert_eq!(
        harness.service.properties(),
        json!({"list": {"18446744073709551615": 1}})
    );
}

#[rstest]
fn delete_removes_and_skips_absent(harness: Harness) {
    harness.service.upsert("a.b", json!(1)).expect("upsert");
    harness.service.delete("a.b").expect("delete");
    assert_eq!(harness.service.properties(), json!({"a": {}}));
    let before = harness.writes();
    harness.service.delete("a.b").expect("delete absent");
    assert_eq!(harness.writes(), before);
}

#[rstest]
fn add_appends_or_creates_arrays(harness: Harness) {
    harness.service.add("list", json!(1)).expect("add");
    harness.service.add("list", json!(2)).expect("add");
    harness.service.upsert("scalar", json!("s")).expect("upsert");
    harness.service.add("scalar", json!(3)).expect("add to scalar");
    assert_eq!(
        harness.service.properties(),
        json!({"list": [1, 2], "scalar": "s"})
    );
}

#[rstest]
fn merge_and_overwrite_follow_strategies(harness: Harness) {
    let path = PropertyPath::parse("svc").expect("path");
    harness.service.merge(json!({"a": [0]}), Some(&path));
    harness.service.merge(json!({"a": [1]}), Some(&path));
    assert_eq!(harness.service.properties(), json!({"svc": {"a": [0, 1]}}));

    harness.service.overwrite(json!({"a": [2]}), Some(&path));
    let once = harness.service.properties();
    harness.service.overwrite(json!({"a": [2]}), Some(&path));
    assert_eq!(harness.service.properties(), once);
    harness.service.overwrite(json!({"b": 1}), Some(&path));
    assert_eq!(harness.service.properties(), json!({"svc": {"b": 1}}));
}

#[rstest]
fn reset_clears_store(harness: Harness) {
    harness.service.upsert("a", json!(1)).expect("upsert");
    harness.service.reset();
    assert_eq!(harness.service.properties(), json!({}));
}
