//! Stream abstractions for the host-facing standard streams.
//!
//! This module provides:
//! - `AsyncInputProvider`: Trait for the stream the host writes XML into (stdin)
//! - `AsyncOutputTarget`: Trait for the streams the runtime writes to (stdout/stderr)
//! - Process stream implementations
//! - In-memory implementations for testing and embedding

mod async_input;
mod async_output;
mod async_std_io;
mod memory;

pub use async_input::AsyncInputProvider;
pub use async_output::AsyncOutputTarget;
pub use async_std_io::{AsyncStderrOutput, AsyncStdinInput, AsyncStdoutOutput};
pub use memory::{AsyncInMemorySink, AsyncInMemorySource};

use tokio::io::AsyncReadExt;

/// Read an input provider to the end and decode it as UTF-8.
pub async fn read_to_string(provider: &dyn AsyncInputProvider) -> std::io::Result<String> {
    let mut reader = provider.open().await?;
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer).await?;
    Ok(buffer)
}
