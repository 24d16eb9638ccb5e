//! Thread-safe event sink serializing events into a `<stream>` document.
//!
//! Any number of streaming tasks queue events through cloned `EventWriter`
//! handles; a single background consumer drains the queue and is the only
//! code that touches the output stream. The consumer is spawned by the first
//! `queue_event` call, so a run that never queues anything writes no
//! `<stream>` envelope at all.
//!
//! Progress is reported on an optional channel: one `EventWritten` report per
//! event, in write order, then one `StreamClosed` report when the consumer
//! exits and one `WriterCompleted` report from `complete`.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use chrono::{DateTime, Utc};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::cancel::CancelToken;
use crate::error::WriterError;
use crate::event::Event;

const STREAM_OPEN: &[u8] = b"<stream>";
const STREAM_CLOSE: &[u8] = b"</stream>";

type BoxedWrite = Box<dyn AsyncWrite + Unpin + Send>;

/// Severity of a line written to the host's error stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Debug => write!(f, "DEBUG"),
            Severity::Info => write!(f, "INFO"),
            Severity::Warn => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// What a progress report refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressKind {
    /// `written_event` was flushed to the output stream
    EventWritten,
    /// The consumer wrote `</stream>` and exited
    StreamClosed,
    /// `complete` finished; nothing else will be reported
    WriterCompleted,
}

/// Out-of-band notification about the writer's progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventWrittenProgressReport {
    pub timestamp: DateTime<Utc>,
    pub kind: ProgressKind,
    /// The written event, or an empty `Event` for terminal reports
    pub written_event: Event,
}

#[derive(Debug, Clone)]
enum QueueSender {
    Bounded(mpsc::Sender<Event>),
    Unbounded(mpsc::UnboundedSender<Event>),
}

#[derive(Debug)]
enum QueueReceiver {
    Bounded(mpsc::Receiver<Event>),
    Unbounded(mpsc::UnboundedReceiver<Event>),
}

impl QueueReceiver {
    async fn recv(&mut self) -> Option<Event> {
        match self {
            QueueReceiver::Bounded(rx) => rx.recv().await,
            QueueReceiver::Unbounded(rx) => rx.recv().await,
        }
    }
}

fn queue(capacity: Option<usize>) -> (QueueSender, QueueReceiver) {
    match capacity {
        Some(capacity) => {
            let (tx, rx) = mpsc::channel(capacity.max(1));
            (QueueSender::Bounded(tx), QueueReceiver::Bounded(rx))
        }
        None => {
            let (tx, rx) = mpsc::unbounded_channel();
            (QueueSender::Unbounded(tx), QueueReceiver::Unbounded(rx))
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct Shared {
    sender: Mutex<Option<QueueSender>>,
    receiver: Mutex<Option<QueueReceiver>>,
    consumer: OnceLock<Mutex<Option<JoinHandle<Result<(), WriterError>>>>>,
    completion: tokio::sync::Mutex<bool>,
    completed: std::sync::atomic::AtomicBool,
    cancel: CancelToken,
    stdout: tokio::sync::Mutex<BoxedWrite>,
    stderr: tokio::sync::Mutex<BoxedWrite>,
    progress: Option<mpsc::UnboundedSender<EventWrittenProgressReport>>,
}

impl Shared {
    fn report(&self, kind: ProgressKind, written_event: Event) {
        if let Some(progress) = &self.progress {
            // A dropped receiver only means nobody is listening.
            let _ = progress.send(EventWrittenProgressReport {
                timestamp: Utc::now(),
                kind,
                written_event,
            });
        }
    }

    async fn write_stdout(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut stdout = self.stdout.lock().await;
        stdout.write_all(bytes).await?;
        stdout.flush().await
    }

    async fn drain(&self, rx: &mut QueueReceiver) -> Result<(), WriterError> {
        self.write_stdout(STREAM_OPEN).await?;
        loop {
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!(target: "modinput", "event writer stopped, discarding queued events");
                    break;
                }
                next = rx.recv() => match next {
                    Some(event) => event,
                    None => break,
                },
            };

            // Rendered into its own buffer so a failure never leaves half an
            // element on the output stream.
            let buffer = event.to_xml()?;
            self.write_stdout(&buffer).await?;
            trace!(target: "modinput", stanza = ?event.stanza, "event written");
            self.report(ProgressKind::EventWritten, event);
        }
        Ok(())
    }

    async fn consume(self: Arc<Self>, mut rx: QueueReceiver) -> Result<(), WriterError> {
        debug!(target: "modinput", "event writer started");
        let drained = self.drain(&mut rx).await;
        drop(rx);

        let closed = self.write_stdout(STREAM_CLOSE).await;
        self.report(ProgressKind::StreamClosed, Event::default());
        debug!(target: "modinput", "event writer finished");

        if self.cancel.is_cancelled() {
            if let Err(e) = drained.and(closed.map_err(WriterError::from)) {
                warn!(target: "modinput", error = %e, "ignoring write error after stop");
            }
            return Ok(());
        }
        drained?;
        closed?;
        Ok(())
    }
}

/// Cloneable handle to the shared event queue and its consumer.
#[derive(Clone)]
pub struct EventWriter {
    shared: Arc<Shared>,
}

impl fmt::Debug for EventWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventWriter")
            .field("stopped", &self.is_stopped())
            .field("completed", &self.is_completed())
            .finish_non_exhaustive()
    }
}

impl EventWriter {
    /// Create a writer with an unbounded queue and no progress reporting.
    pub fn new(stdout: BoxedWrite, stderr: BoxedWrite) -> Self {
        EventWriterBuilder::new(stdout, stderr).build()
    }

    /// Start configuring a writer.
    pub fn builder(stdout: BoxedWrite, stderr: BoxedWrite) -> EventWriterBuilder {
        EventWriterBuilder::new(stdout, stderr)
    }

    /// Queue an event for writing.
    ///
    /// The first call starts the background consumer. Waits while a bounded
    /// queue is full. After `stop_writing_events` the event is accepted and
    /// dropped. Fails with `WriterError::Completed` once `complete` has run.
    pub async fn queue_event(&self, event: Event) -> Result<(), WriterError> {
        if self.is_completed() {
            return Err(WriterError::Completed);
        }
        if self.shared.cancel.is_cancelled() {
            return Ok(());
        }

        // The consumer is started under the sender lock, so `complete` either
        // sees it running or finds the sender already gone.
        let sender = {
            let guard = lock(&self.shared.sender);
            let sender = guard.clone().ok_or(WriterError::Completed)?;
            self.ensure_started();
            sender
        };

        let sent = match sender {
            QueueSender::Unbounded(tx) => tx.send(event).is_ok(),
            QueueSender::Bounded(tx) => {
                tokio::select! {
                    biased;
                    _ = self.shared.cancel.cancelled() => return Ok(()),
                    sent = tx.send(event) => sent.is_ok(),
                }
            }
        };

        if sent || self.shared.cancel.is_cancelled() {
            Ok(())
        } else {
            Err(WriterError::Task("event writer is no longer consuming events".into()))
        }
    }

    fn ensure_started(&self) {
        self.shared.consumer.get_or_init(|| {
            let receiver = lock(&self.shared.receiver).take();
            Mutex::new(receiver.map(|rx| tokio::spawn(self.shared.clone().consume(rx))))
        });
    }

    /// Stop the consumer after the event it is currently writing.
    ///
    /// Queued events are discarded and `</stream>` is written.
    pub fn stop_writing_events(&self) {
        if self.shared.cancel.cancel() {
            debug!(target: "modinput", "stop writing events requested");
        }
    }

    /// Close the queue, wait for the consumer to drain it (or stop) and flush.
    ///
    /// Safe to call repeatedly and concurrently; only the first call does any
    /// work or emits the `WriterCompleted` report.
    pub async fn complete(&self) -> Result<(), WriterError> {
        let mut done = self.shared.completion.lock().await;
        if *done {
            return Ok(());
        }

        drop(lock(&self.shared.sender).take());
        let handle = lock(self.shared.consumer.get_or_init(|| Mutex::new(None))).take();
        let consumed = match handle {
            Some(handle) => match handle.await {
                Ok(result) => result,
                Err(e) => Err(WriterError::Task(e.to_string())),
            },
            None => Ok(()),
        };

        let flushed = self.shared.stdout.lock().await.flush().await;

        self.shared.report(ProgressKind::WriterCompleted, Event::default());
        self.shared
            .completed
            .store(true, std::sync::atomic::Ordering::SeqCst);
        *done = true;

        consumed?;
        if !self.shared.cancel.is_cancelled() {
            flushed?;
        }
        Ok(())
    }

    /// Write `"{SEVERITY} {message}"` as one line on the error stream.
    pub async fn log(&self, severity: Severity, message: &str) -> Result<(), WriterError> {
        if self.is_completed() {
            return Err(WriterError::Completed);
        }
        let line = format!("{severity} {message}\n");
        let mut stderr = self.shared.stderr.lock().await;
        stderr.write_all(line.as_bytes()).await?;
        stderr.flush().await?;
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.shared
            .completed
            .load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }
}

/// Builder for `EventWriter`.
pub struct EventWriterBuilder {
    stdout: BoxedWrite,
    stderr: BoxedWrite,
    capacity: Option<usize>,
    progress: Option<mpsc::UnboundedSender<EventWrittenProgressReport>>,
}

impl EventWriterBuilder {
    pub fn new(stdout: BoxedWrite, stderr: BoxedWrite) -> Self {
        Self {
            stdout,
            stderr,
            capacity: None,
            progress: None,
        }
    }

    /// Bound the queue; `queue_event` waits while it is full.
    pub fn with_capacity(mut self, capacity: Option<usize>) -> Self {
        self.capacity = capacity;
        self
    }

    /// Send progress reports to `progress`.
    pub fn with_progress(mut self, progress: mpsc::UnboundedSender<EventWrittenProgressReport>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn build(self) -> EventWriter {
        let (sender, receiver) = queue(self.capacity);
        EventWriter {
            shared: Arc::new(Shared {
                sender: Mutex::new(Some(sender)),
                receiver: Mutex::new(Some(receiver)),
                consumer: OnceLock::new(),
                completion: tokio::sync::Mutex::new(false),
                completed: std::sync::atomic::AtomicBool::new(false),
                cancel: CancelToken::new(),
                stdout: tokio::sync::Mutex::new(self.stdout),
                stderr: tokio::sync::Mutex::new(self.stderr),
                progress: self.progress,
            }),
        }
    }
}
