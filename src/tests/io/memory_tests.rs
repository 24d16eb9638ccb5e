//! Tests for the in-memory streams.

use tokio::io::AsyncWriteExt;

use crate::io::read_to_string;
use crate::{AsyncInMemorySink, AsyncInMemorySource, AsyncInputProvider, AsyncOutputTarget};

#[tokio::test]
async fn source_can_be_read_more_than_once() {
    let source = AsyncInMemorySource::from_string("stdin", "<input/>");
    assert_eq!(source.id(), "stdin");
    assert_eq!(read_to_string(&source).await.unwrap(), "<input/>");
    assert_eq!(read_to_string(&source).await.unwrap(), "<input/>");
}

#[tokio::test]
async fn empty_source_reads_empty() {
    let source = AsyncInMemorySource::empty("stdin");
    assert_eq!(read_to_string(&source).await.unwrap(), "");
}

#[tokio::test]
async fn invalid_utf8_is_an_error() {
    let source = AsyncInMemorySource::new("stdin", vec![0xff, 0xfe]);
    assert!(read_to_string(&source).await.is_err());
}

#[tokio::test]
async fn sink_clones_share_one_buffer() {
    let sink = AsyncInMemorySink::new("stdout");
    let observer = sink.clone();

    let mut first = sink.open_append().await.unwrap();
    first.write_all(b"<stream>").await.unwrap();
    let mut second = sink.open_append().await.unwrap();
    second.write_all(b"</stream>").await.unwrap();

    assert_eq!(observer.contents_string(), "<stream></stream>");
    assert_eq!(observer.contents(), b"<stream></stream>".to_vec());
}

#[tokio::test]
async fn overwrite_and_clear_reset_the_buffer() {
    let sink = AsyncInMemorySink::new("stdout");
    sink.open_append().await.unwrap().write_all(b"old").await.unwrap();

    let mut handle = sink.open_overwrite().await.unwrap();
    handle.write_all(b"new").await.unwrap();
    assert_eq!(sink.contents_string(), "new");

    sink.clear();
    assert_eq!(sink.contents_string(), "");
}
