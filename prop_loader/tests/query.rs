//! Reading loaded properties back through `PropertyQuery`.

mod common;

use common::{Recorded, recorded, required};
use futures::StreamExt;
use prop_loader::{InterpolationConfig, Loader, PropertyQuery};
use prop_loader_test_helpers::sources::{EventLog, ScriptedSource};
use rstest::rstest;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, PartialEq)]
struct Endpoint {
    url: String,
    retries: u8,
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn loaded_values_are_readable(recorded: Recorded) {
    let log = EventLog::new();
    let loader = Loader::builder(recorded.service.clone())
        .source(
            ScriptedSource::new("Remote", &log)
                .emit(
                    5,
                    json!({
                        "host": "example.org",
                        "endpoint": {"url": "https://{{ host }}/v1", "retries": 2}
                    }),
                )
                .with_options(required()),
        )
        .build();
    loader.load().await.expect("remote loads");

    let query = PropertyQuery::for_service(&recorded.service);
    let endpoint = query
        .get_transpiled_property("endpoint", None, &InterpolationConfig::default().use_store(true))
        .expect("valid delimiters")
        .map(serde_json::from_value::<Endpoint>)
        .transpose()
        .expect("endpoint shape");
    assert_eq!(
        endpoint,
        Some(Endpoint {
            url: String::from("https://example.org/v1"),
            retries: 2
        })
    );
    assert_eq!(query.get_property_as::<u8>("endpoint.retries").expect("number"), Some(2));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn watchers_follow_background_batches(recorded: Recorded) {
    let log = EventLog::new();
    let loader = Loader::builder(recorded.service.clone())
        .source(
            ScriptedSource::new("Flags", &log)
                .emit(5, json!({"flags": {"beta": false}}))
                .emit(10, json!({"flags": {"beta": true}}))
                .with_options(required()),
        )
        .build();
    let query = PropertyQuery::for_service(&recorded.service);
    let mut beta = query.watch_property("flags.beta").expect("valid path");

    assert_eq!(beta.next().await, Some(None));
    loader.load().await.expect("first batch resolves");
    assert_eq!(beta.next().await, Some(Some(json!(false))));
    assert_eq!(beta.next().await, Some(Some(json!(true))));
}
