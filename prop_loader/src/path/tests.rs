//! Unit tests for path parsing and tree access.

use rstest::rstest;
use serde_json::json;

use super::{IntoPropertyPath, PropertyPath, get_at, remove_at, set_at};

#[rstest]
#[case("")]
#[case(".")]
#[case("a..b")]
#[case("a.")]
#[case(".a")]
fn rejects_malformed_strings(#[case] raw: &str) {
    let err = PropertyPath::parse(raw).expect_err("path should be invalid");
    assert!(err.is_invalid_path(), "unexpected error {err:?}");
}

#[test]
fn rejects_empty_segment_lists() {
    assert!(Vec::<String>::new().into_property_path().is_err());
    assert!(["a", ""].into_property_path().is_err());
}

#[test]
fn string_and_segment_forms_agree() {
    let dotted = "a.b.c".into_property_path().expect("dotted path");
    let listed = ["a", "b", "c"].into_property_path().expect("segment path");
    assert_eq!(dotted, listed);
    assert_eq!(dotted.to_string(), "a.b.c");
    assert_eq!(dotted.len(), 3);
}

#[test]
fn join_appends_segment() {
    let base = PropertyPath::parse("a").expect("path");
    assert_eq!(base.join("b").expect("joined").to_string(), "a.b");
    assert!(base.join("").is_err());
}

#[test]
fn get_walks_objects_and_arrays() {
    let tree = json!({"a": {"list": [{"x": 1}]}});
    let path = PropertyPath::parse("a.list.0.x").expect("path");
    assert_eq!(get_at(&tree, &path), Some(&json!(1)));
    let missing = PropertyPath::parse("a.list.4.x").expect("path");
    assert_eq!(get_at(&tree, &missing), None);
    let through_scalar = PropertyPath::parse("a.list.0.x.y").expect("path");
    assert_eq!(get_at(&tree, &through_scalar), None);
}

#[test]
fn set_creates_intermediate_objects() {
    let mut tree = json!({"a": 5});
    set_at(&mut tree, &PropertyPath::parse("a.b.c").expect("path"), json!(true));
    assert_eq!(tree, json!({"a": {"b": {"c": true}}}));
}

#[test]
fn set_into_array_pads_with_null() {
    let mut tree = json!({"list": [1]});
    set_at(&mut tree, &PropertyPath::parse("list.2").expect("path"), json!(3));
    assert_eq!(tree, json!({"list": [1, null, 3]}));
}

#[rstest]
#[case("list.18446744073709551615", "18446744073709551615")]
#[case("list.4000000000", "4000000000")]
#[case("list.3", "3")]
fn set_beyond_padding_reach_keys_an_object(#[case] raw: &str, #[case] key: &str) {
    let mut tree = json!({"list": [1]});
    set_at(&mut tree, &PropertyPath::parse(raw).expect("path"), json!(true));
    assert_eq!(tree, json!({"list": {key: true}}));
}

#[test]
fn set_into_empty_array_appends_at_zero() {
    let mut tree = json!({"list": []});
    set_at(&mut tree, &PropertyPath::parse("list.0").expect("path"), json!("a"));
    assert_eq!(tree, json!({"list": ["a"]}));
}

#[test]
fn set_replaces_non_object_root() {
    let mut tree = json!(null);
    set_at(&mut tree, &PropertyPath::parse("k").expect("path"), json!("v"));
    assert_eq!(tree, json!({"k": "v"}));
}

#[test]
fn remove_returns_previous_value() {
    let mut tree = json!({"a": {"b": 1, "c": 2}, "list": [1, 2, 3]});
    let removed = remove_at(&mut tree, &PropertyPath::parse("a.b").expect("path"));
    assert_eq!(removed, Some(json!(1)));
    let element = remove_at(&mut tree, &PropertyPath::parse("list.0").expect("path"));
    assert_eq!(element, Some(json!(1)));
    assert_eq!(tree, json!({"a": {"c": 2}, "list": [2, 3]}));
    assert_eq!(
        remove_at(&mut tree, &PropertyPath::parse("nope.x").expect("path")),
        None
    );
}

#[test]
fn lenient_discards_invalid_paths() {
    assert!(PropertyPath::lenient("").is_none());
    assert_eq!(
        PropertyPath::lenient("a.b").map(|p| p.to_string()).as_deref(),
        Some("a.b")
    );
}
