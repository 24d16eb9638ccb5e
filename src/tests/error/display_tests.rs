//! Tests for error messages and conversions.

use std::error::Error as _;

use crate::error::{ModularInputError, WriterError, XmlError};

#[test]
fn stream_error_names_the_stanza_and_keeps_the_source() {
    let err = ModularInputError::Stream {
        stanza: "foobar://aaa".into(),
        source: "connection refused".into(),
    };
    assert_eq!(
        err.to_string(),
        "streaming stanza 'foobar://aaa' failed: connection refused"
    );
    assert_eq!(err.source().unwrap().to_string(), "connection refused");
}

#[test]
fn writer_errors_convert_transparently() {
    let err: ModularInputError = WriterError::Completed.into();
    assert_eq!(err.to_string(), "event writer has already completed");

    let err: ModularInputError = XmlError::Invalid("no item".into()).into();
    assert_eq!(err.to_string(), "invalid document: no item");
}

#[test]
fn validation_fault_message() {
    let err = ModularInputError::Validation("backend unreachable".into());
    assert_eq!(err.to_string(), "validation failed: backend unreachable");
}
