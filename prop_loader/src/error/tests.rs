//! Unit tests for error construction and display.

use rstest::rstest;

use super::{PropError, SourceError};
use crate::PropResultExt;

#[rstest]
#[case(Some("boom"), "required property source 'A' failed to load: boom")]
#[case(Some(""), "required property source 'A' failed to load")]
#[case(None, "required property source 'A' failed to load")]
fn required_source_message_names_source(#[case] message: Option<&str>, #[case] expected: &str) {
    let err = PropError::RequiredSource {
        source_name: "A".into(),
        message: message.map(str::to_owned),
    };
    assert_eq!(err.to_string(), expected);
    assert_eq!(err.source_name(), Some("A"));
}

#[test]
fn source_load_keeps_underlying_error() {
    let cause: SourceError = "timeout".into();
    let err = PropError::source_load("HttpSource", cause);
    assert!(err.to_string().contains("HttpSource"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn figment_errors_become_gathering() {
    let err: PropError = figment::Error::from("bad env").into();
    assert!(matches!(err, PropError::Gathering(_)));
    assert_eq!(err.source_name(), None);
}

#[test]
fn classification_helpers() {
    assert!(PropError::invalid_path("", "empty").is_invalid_path());
    assert!(PropError::Cancelled.is_cancelled());
    assert!(!PropError::Cancelled.is_invalid_path());
}

#[test]
fn into_prop_shares_converted_errors() {
    let result: Result<(), figment::Error> = Err(figment::Error::from("bad value"));
    let err = result.into_prop().expect_err("conversion keeps the failure");
    assert!(matches!(*err, PropError::Gathering(_)));
    assert!(err.to_string().contains("bad value"));
}
