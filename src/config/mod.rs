//! Runtime configuration.
//!
//! This module provides:
//! - `RuntimeConfig`: Queue bound, termination watchers and shutdown timing
//!
//! The library reads no files or environment variables; an embedding program
//! builds a `RuntimeConfig` in code or deserializes it from its own settings.

mod runtime;

pub use runtime::RuntimeConfig;
