//! The `ModularInput` capability and the dispatcher that drives it.
//!
//! `ModularInputRunner` interprets argv and stdin as one of the three
//! subprotocols (scheme, validate-arguments, streaming) and returns the
//! process exit status. Standard streams are injected so a run can be driven
//! entirely from memory.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::cli::Mode;
use crate::config::RuntimeConfig;
use crate::error::{BoxError, ModularInputError};
use crate::event_writer::{EventWriter, EventWrittenProgressReport, Severity};
use crate::format::error_document;
use crate::io::{
    AsyncInputProvider, AsyncOutputTarget, AsyncStderrOutput, AsyncStdinInput, AsyncStdoutOutput,
    read_to_string,
};
use crate::model::{InputDefinition, InputDefinitionCollection, Scheme, Validation, ValidationOutcome};
use crate::termination::TerminationWatcher;

/// Exit status of a successful run.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status of a failed run.
pub const EXIT_FAILURE: i32 = -1;

const INVALID_ARGUMENTS: &str = "Invalid arguments to modular input.";

/// What a concrete modular input implements.
#[async_trait]
pub trait ModularInput: Send + Sync + 'static {
    /// The scheme printed in `--scheme` mode and consulted for argument
    /// validation delegates.
    fn scheme(&self) -> Scheme;

    /// Validate a candidate stanza after every argument delegate accepted it.
    ///
    /// Return `Ok(ValidationOutcome::Rejected(..))` to refuse the
    /// configuration; an `Err` is treated as a fault.
    async fn validate(&self, _validation: &Validation) -> Result<ValidationOutcome, BoxError> {
        Ok(ValidationOutcome::Accepted)
    }

    /// Stream events for one stanza. Runs concurrently with the tasks of
    /// the other stanzas of the same invocation.
    async fn stream_events(&self, input: InputDefinition, writer: EventWriter) -> Result<(), BoxError>;
}

/// Collapse a message onto one log line.
fn single_line(message: &str) -> String {
    message.replace("\r\n", " | ").replace(['\n', '\r'], " | ")
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("modular input panicked: {detail}")
}

/// Dispatcher for a single process invocation.
pub struct ModularInputRunner {
    stdin: Arc<dyn AsyncInputProvider>,
    stdout: Arc<dyn AsyncOutputTarget>,
    stderr: Arc<dyn AsyncOutputTarget>,
    config: RuntimeConfig,
    progress: Option<mpsc::UnboundedSender<EventWrittenProgressReport>>,
    watcher: Option<Arc<TerminationWatcher>>,
}

impl Default for ModularInputRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ModularInputRunner {
    /// A runner bound to the process streams, with no termination watcher.
    pub fn new() -> Self {
        Self {
            stdin: Arc::new(AsyncStdinInput::new()),
            stdout: Arc::new(AsyncStdoutOutput::new()),
            stderr: Arc::new(AsyncStderrOutput::new()),
            config: RuntimeConfig::default(),
            progress: None,
            watcher: None,
        }
    }

    pub fn with_stdin(mut self, stdin: Arc<dyn AsyncInputProvider>) -> Self {
        self.stdin = stdin;
        self
    }

    pub fn with_stdout(mut self, stdout: Arc<dyn AsyncOutputTarget>) -> Self {
        self.stdout = stdout;
        self
    }

    pub fn with_stderr(mut self, stderr: Arc<dyn AsyncOutputTarget>) -> Self {
        self.stderr = stderr;
        self
    }

    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Forward the event writer's progress reports to `progress`.
    pub fn with_progress(mut self, progress: mpsc::UnboundedSender<EventWrittenProgressReport>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Stop writing when `watcher` reports a shutdown, and abort streaming
    /// tasks once the process is terminated or the grace period ran out.
    pub fn with_termination_watcher(mut self, watcher: Arc<TerminationWatcher>) -> Self {
        self.watcher = Some(watcher);
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Run one invocation. `args` excludes the program name.
    ///
    /// The event writer is always completed before returning, so an opened
    /// `<stream>` is always closed.
    pub async fn run<M: ModularInput>(&self, input: Arc<M>, args: &[String]) -> i32 {
        let writer = match self.open_writer().await {
            Ok(writer) => writer,
            Err(e) => {
                error!(target: "modinput", error = %e, "failed to open output streams");
                return EXIT_FAILURE;
            }
        };
        if let Some(watcher) = &self.watcher {
            watcher.attach(&writer);
        }

        let dispatched = AssertUnwindSafe(self.dispatch(input, args, &writer))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(ModularInputError::Task(panic_message(payload.as_ref()))));

        let mut status = match dispatched {
            Ok(status) => status,
            Err(e) => {
                error!(target: "modinput", error = %e, "modular input failed");
                let message = single_line(&e.to_string());
                if let Err(log_error) = writer.log(Severity::Fatal, &message).await {
                    warn!(target: "modinput", error = %log_error, "could not report fatal error");
                }
                EXIT_FAILURE
            }
        };

        if let Err(e) = writer.complete().await {
            error!(target: "modinput", error = %e, "event writer did not complete cleanly");
            status = EXIT_FAILURE;
        }
        status
    }

    async fn open_writer(&self) -> std::io::Result<EventWriter> {
        let stdout = self.stdout.open_append().await?;
        let stderr = self.stderr.open_append().await?;
        let mut builder =
            EventWriter::builder(stdout, stderr).with_capacity(self.config.queue_capacity);
        if let Some(progress) = &self.progress {
            builder = builder.with_progress(progress.clone());
        }
        Ok(builder.build())
    }

    async fn dispatch<M: ModularInput>(
        &self,
        input: Arc<M>,
        args: &[String],
        writer: &EventWriter,
    ) -> Result<i32, ModularInputError> {
        let mode = Mode::from_args(args);
        debug!(target: "modinput", %mode, "dispatching");

        match mode {
            Mode::Scheme => {
                let xml = input.scheme().to_xml()?;
                self.write_document(&xml).await?;
                Ok(EXIT_SUCCESS)
            }
            Mode::ValidateArguments => self.validate_arguments(input.as_ref()).await,
            Mode::Stream => self.stream(input, writer).await,
            Mode::Invalid => {
                writer.log(Severity::Error, INVALID_ARGUMENTS).await?;
                Ok(EXIT_FAILURE)
            }
        }
    }

    async fn write_document(&self, document: &str) -> std::io::Result<()> {
        let mut stdout = self.stdout.open_append().await?;
        stdout.write_all(document.as_bytes()).await?;
        stdout.flush().await
    }

    /// A rejection is delivered as an `<error>` document with exit status 0.
    /// A fault is delivered the same way but exits with -1.
    async fn validate_arguments<M: ModularInput>(&self, input: &M) -> Result<i32, ModularInputError> {
        let (outcome, status) = match self.check(input).await {
            Ok(outcome) => (outcome, EXIT_SUCCESS),
            Err(e) => {
                warn!(target: "modinput", error = %e, "validation faulted");
                (ValidationOutcome::Rejected(e.to_string()), EXIT_FAILURE)
            }
        };

        if let ValidationOutcome::Rejected(message) = outcome {
            info!(target: "modinput", %message, "configuration rejected");
            self.write_document(&error_document(&message)?).await?;
        }
        Ok(status)
    }

    async fn check<M: ModularInput>(&self, input: &M) -> Result<ValidationOutcome, ModularInputError> {
        let payload = read_to_string(self.stdin.as_ref()).await?;
        let validation = Validation::from_xml(&payload)?;
        let scheme = input.scheme();

        for argument in &scheme.arguments {
            let (Some(delegate), Some(parameter)) = (
                &argument.validation_delegate,
                validation.parameter(&argument.name),
            ) else {
                continue;
            };
            if let rejected @ ValidationOutcome::Rejected(_) = delegate.check(parameter) {
                return Ok(rejected);
            }
        }

        input
            .validate(&validation)
            .await
            .map_err(ModularInputError::Validation)
    }

    async fn stream<M: ModularInput>(
        &self,
        input: Arc<M>,
        writer: &EventWriter,
    ) -> Result<i32, ModularInputError> {
        let payload = read_to_string(self.stdin.as_ref()).await?;
        let definitions = InputDefinitionCollection::from_xml(&payload)?;
        info!(target: "modinput", stanzas = definitions.len(), "streaming");

        let mut tasks = JoinSet::new();
        for definition in definitions {
            let input = input.clone();
            let writer = writer.clone();
            tasks.spawn(async move {
                let stanza = definition.name.clone();
                input
                    .stream_events(definition, writer)
                    .await
                    .map_err(|source| ModularInputError::Stream { stanza, source })
            });
        }

        let mut abort = self.abort_signal();
        let mut aborted = false;
        let mut first_error = None;
        loop {
            let next = if aborted {
                tasks.join_next().await
            } else {
                tokio::select! {
                    next = tasks.join_next() => next,
                    _ = &mut abort => {
                        warn!(target: "modinput", remaining = tasks.len(), "aborting streaming tasks");
                        tasks.abort_all();
                        aborted = true;
                        continue;
                    }
                }
            };

            match next {
                None => break,
                Some(Ok(Ok(()))) => {}
                Some(Ok(Err(e))) => {
                    first_error.get_or_insert(e);
                }
                Some(Err(e)) if e.is_cancelled() => {}
                Some(Err(e)) if e.is_panic() => {
                    let message = panic_message(e.into_panic().as_ref());
                    first_error.get_or_insert(ModularInputError::Task(message));
                }
                Some(Err(e)) => {
                    first_error.get_or_insert(ModularInputError::Task(e.to_string()));
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(EXIT_SUCCESS),
        }
    }

    /// Resolves when streaming tasks should be abandoned: immediately on
    /// termination, or `shutdown_grace` after a shutdown request.
    fn abort_signal(&self) -> BoxFuture<'static, ()> {
        let Some(watcher) = self.watcher.clone() else {
            return futures::future::pending().boxed();
        };
        let grace = self.config.shutdown_grace;
        async move {
            let after_grace = async {
                watcher.shutdown_signal().await;
                tokio::time::sleep(grace).await;
            };
            tokio::select! {
                _ = watcher.terminated_signal() => {}
                _ = after_grace => {}
            }
        }
        .boxed()
    }
}

/// Run `input` as the current process: argv from `std::env::args`, the real
/// standard streams and a termination watcher configured from `config`.
///
/// Installs a panic hook that reports through `tracing`, so a panicking
/// callback reaches the host only as the `FATAL` line.
pub async fn run_with_config<M: ModularInput>(input: M, config: RuntimeConfig) -> i32 {
    std::panic::set_hook(Box::new(|info| {
        error!(target: "modinput", panic = %info, "modular input panicked");
    }));
    let args: Vec<String> = std::env::args().skip(1).collect();
    let watcher = Arc::new(TerminationWatcher::start(&config));
    ModularInputRunner::new()
        .with_config(config)
        .with_termination_watcher(watcher)
        .run(Arc::new(input), &args)
        .await
}

/// `run_with_config` with the default configuration.
pub async fn run<M: ModularInput>(input: M) -> i32 {
    run_with_config(input, RuntimeConfig::default()).await
}

/// Build a multi-threaded Tokio runtime and `run` on it.
pub fn run_blocking<M: ModularInput>(input: M) -> i32 {
    match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime.block_on(run(input)),
        Err(e) => {
            eprintln!("FATAL {}", single_line(&e.to_string()));
            EXIT_FAILURE
        }
    }
}
