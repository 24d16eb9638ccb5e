//! # modinput
//!
//! Runtime for modular inputs: external programs that a search-and-indexing
//! host launches to stream events into it over stdin/stdout.
//!
//! ## Overview
//!
//! modinput provides:
//! - **Command dispatch**: `--scheme`, `--validate-arguments` and streaming mode
//! - **Host XML model**: Scheme, arguments, input definitions, validation requests
//! - **Event writer**: A concurrent queue drained by one task into a `<stream>` document
//! - **Termination watching**: Ctrl-C, SIGTERM/SIGHUP and parent exit stop the writer
//! - **Injectable streams**: Every run can be driven from in-memory buffers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use modinput::{BoxError, Event, EventWriter, InputDefinition, ModularInput, Scheme};
//!
//! struct Hello;
//!
//! #[async_trait::async_trait]
//! impl ModularInput for Hello {
//!     fn scheme(&self) -> Scheme {
//!         Scheme::new("hello")
//!     }
//!
//!     async fn stream_events(
//!         &self,
//!         input: InputDefinition,
//!         writer: EventWriter,
//!     ) -> Result<(), BoxError> {
//!         writer
//!             .queue_event(Event::new("hello world").with_stanza(input.name))
//!             .await?;
//!         Ok(())
//!     }
//! }
//!
//! fn main() {
//!     std::process::exit(modinput::run_blocking(Hello));
//! }
//! ```
//!
//! ## Streaming semantics
//!
//! - One task is spawned per stanza; all of them share a single `EventWriter`.
//! - Events queued by one task are written in the order they were queued.
//!   Events from different stanzas may interleave; each carries its `stanza`
//!   attribute so the host can tell them apart.
//! - The `<stream>` envelope is opened by the first queued event and closed
//!   when the writer completes or is stopped.
//! - Logging for the host goes to stderr as `"{SEVERITY} {message}"` lines.
//!   Internal diagnostics use `tracing` under the `modinput` target.
//!
//! ## Features
//!
//! - `miette` - Pretty error reporting with miette

pub mod cancel;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod event_writer;
pub mod format;
pub mod io;
pub mod model;
pub mod modular_input;
pub mod termination;

// Re-exports for convenience
pub use cancel::CancelToken;
pub use cli::Mode;
pub use config::RuntimeConfig;
pub use error::{BoxError, ModularInputError, ParameterError, WriterError, XmlError};
pub use event::Event;
pub use event_writer::{
    EventWriter, EventWriterBuilder, EventWrittenProgressReport, ProgressKind, Severity,
};
pub use io::{
    AsyncInMemorySink, AsyncInMemorySource, AsyncInputProvider, AsyncOutputTarget,
    AsyncStderrOutput, AsyncStdinInput, AsyncStdoutOutput,
};
pub use model::{
    Argument, DataType, InputDefinition, InputDefinitionCollection, MultiValueParameter,
    Parameter, Scheme, SingleValueParameter, StreamingMode, Validation, ValidationOutcome,
};
pub use modular_input::{
    EXIT_FAILURE, EXIT_SUCCESS, ModularInput, ModularInputRunner, run, run_blocking,
    run_with_config,
};
pub use termination::{ShutdownReason, TerminationWatcher};

// Miette re-exports
#[cfg(feature = "miette")]
pub use error::InputDiagnostic;
