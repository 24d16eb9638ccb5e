//! Async input provider trait definition.

use std::fmt::Debug;

use async_trait::async_trait;
use tokio::io::AsyncRead;

/// Trait for asynchronous input providers.
///
/// The dispatcher reads the host's XML payload (input definitions or a
/// validation request) through this trait instead of touching stdin.
#[async_trait]
pub trait AsyncInputProvider: Send + Sync + Debug {
    /// Returns a unique identifier for this input source.
    ///
    /// Convention: "-" for stdin.
    fn id(&self) -> &str;

    /// Open and return a new async readable stream.
    async fn open(&self) -> std::io::Result<Box<dyn AsyncRead + Unpin + Send>>;
}
