//! Detecting that the host is shutting the process down.
//!
//! Several sources race to raise the same notification: Ctrl-C, SIGTERM and
//! SIGHUP on unix, and the parent process disappearing. The first one wins;
//! later signals are no-ops. SIGTERM and SIGHUP additionally mark the process
//! as terminated.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cancel::CancelToken;
use crate::config::RuntimeConfig;
use crate::event_writer::EventWriter;

/// Which source raised the shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Interrupt,
    Terminate,
    Hangup,
    ParentExited,
    /// Raised programmatically through `request_shutdown`
    Requested,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Interrupt => write!(f, "interrupt"),
            ShutdownReason::Terminate => write!(f, "terminate"),
            ShutdownReason::Hangup => write!(f, "hangup"),
            ShutdownReason::ParentExited => write!(f, "parent exited"),
            ShutdownReason::Requested => write!(f, "requested"),
        }
    }
}

type Handler = Box<dyn FnOnce(ShutdownReason) + Send>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A flag that fires once and runs the handlers registered for it.
struct Latch {
    token: CancelToken,
    handlers: Mutex<Vec<Handler>>,
}

impl Latch {
    fn new() -> Self {
        Self {
            token: CancelToken::new(),
            handlers: Mutex::new(Vec::new()),
        }
    }

    fn fire(&self, reason: ShutdownReason) -> bool {
        if !self.token.cancel() {
            return false;
        }
        let handlers = std::mem::take(&mut *lock(&self.handlers));
        for handler in handlers {
            handler(reason);
        }
        true
    }

    fn subscribe(&self, handler: Handler, reason: impl FnOnce() -> ShutdownReason) {
        let mut handlers = lock(&self.handlers);
        if self.token.is_cancelled() {
            drop(handlers);
            handler(reason());
        } else {
            handlers.push(handler);
        }
    }
}

struct Inner {
    reason: OnceLock<ShutdownReason>,
    shutdown: Latch,
    terminated: Latch,
}

impl Inner {
    fn reason(&self) -> ShutdownReason {
        self.reason
            .get()
            .copied()
            .unwrap_or(ShutdownReason::Requested)
    }

    fn request_shutdown(&self, reason: ShutdownReason) -> bool {
        let _ = self.reason.set(reason);
        let first = self.shutdown.fire(self.reason());
        if first {
            info!(target: "modinput", %reason, "shutdown requested");
        }
        first
    }

    fn terminate(&self, reason: ShutdownReason) -> bool {
        self.request_shutdown(reason);
        self.terminated.fire(self.reason())
    }
}

/// Observes host lifecycle signals and exposes them as one-shot notifications.
pub struct TerminationWatcher {
    inner: Arc<Inner>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl fmt::Debug for TerminationWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminationWatcher")
            .field("shutdown_requested", &self.shutdown_requested())
            .field("terminated", &self.terminated())
            .finish_non_exhaustive()
    }
}

impl Default for TerminationWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminationWatcher {
    /// Create a watcher with no signal sources attached.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                reason: OnceLock::new(),
                shutdown: Latch::new(),
                terminated: Latch::new(),
            }),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Create a watcher and attach the sources enabled in `config`.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn start(config: &RuntimeConfig) -> Self {
        let watcher = Self::new();
        if config.watch_signals {
            watcher.watch_signals();
        }
        if config.watch_parent {
            watcher.watch_parent(config.parent_poll_interval);
        }
        watcher
    }

    pub fn shutdown_requested(&self) -> bool {
        self.inner.shutdown.token.is_cancelled()
    }

    pub fn terminated(&self) -> bool {
        self.inner.terminated.token.is_cancelled()
    }

    /// The source that won the race, once shutdown has been requested.
    pub fn reason(&self) -> Option<ShutdownReason> {
        self.inner.reason.get().copied()
    }

    /// Raise the shutdown notification. Returns `false` if it was already raised.
    pub fn request_shutdown(&self, reason: ShutdownReason) -> bool {
        self.inner.request_shutdown(reason)
    }

    /// Raise shutdown (if not yet raised) and the terminated notification.
    pub fn terminate(&self, reason: ShutdownReason) -> bool {
        self.inner.terminate(reason)
    }

    /// Run `handler` once when shutdown is requested, or now if it already was.
    pub fn on_shutdown_requested<F>(&self, handler: F)
    where
        F: FnOnce(ShutdownReason) + Send + 'static,
    {
        let inner = self.inner.clone();
        self.inner
            .shutdown
            .subscribe(Box::new(handler), move || inner.reason());
    }

    /// Run `handler` once when the process is terminated, or now if it already was.
    pub fn on_terminated<F>(&self, handler: F)
    where
        F: FnOnce(ShutdownReason) + Send + 'static,
    {
        let inner = self.inner.clone();
        self.inner
            .terminated
            .subscribe(Box::new(handler), move || inner.reason());
    }

    /// Stop `writer` as soon as shutdown is requested.
    pub fn attach(&self, writer: &EventWriter) {
        let writer = writer.clone();
        self.on_shutdown_requested(move |_| writer.stop_writing_events());
    }

    /// Wait for the shutdown notification.
    pub async fn shutdown_signal(&self) {
        self.inner.shutdown.token.cancelled().await
    }

    /// Wait for the terminated notification.
    pub async fn terminated_signal(&self) {
        self.inner.terminated.token.cancelled().await
    }

    /// Install Ctrl-C (and on unix SIGTERM / SIGHUP) handlers.
    pub fn watch_signals(&self) {
        let inner = self.inner.clone();
        self.spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    inner.request_shutdown(ShutdownReason::Interrupt);
                }
                Err(e) => warn!(target: "modinput", error = ?e, "failed to install Ctrl+C handler"),
            }
        });

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            for (kind, reason) in [
                (SignalKind::terminate(), ShutdownReason::Terminate),
                (SignalKind::hangup(), ShutdownReason::Hangup),
            ] {
                let inner = self.inner.clone();
                self.spawn(async move {
                    match signal(kind) {
                        Ok(mut sig) => {
                            if sig.recv().await.is_some() {
                                inner.terminate(reason);
                            }
                        }
                        Err(e) => {
                            warn!(target: "modinput", error = ?e, %reason, "failed to install signal handler")
                        }
                    }
                });
            }
        }
    }

    /// Poll the parent process id and raise shutdown when it changes.
    ///
    /// An orphaned process is re-parented, so a different parent id means
    /// the host that launched us is gone. No-op on non-unix targets.
    pub fn watch_parent(&self, interval: Duration) {
        #[cfg(unix)]
        {
            let inner = self.inner.clone();
            self.spawn(async move {
                let parent = std::os::unix::process::parent_id();
                let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
                loop {
                    ticker.tick().await;
                    if inner.shutdown.token.is_cancelled() {
                        break;
                    }
                    if std::os::unix::process::parent_id() != parent {
                        inner.request_shutdown(ShutdownReason::ParentExited);
                        break;
                    }
                }
            });
        }
        #[cfg(not(unix))]
        let _ = interval;
    }

    fn spawn<F>(&self, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        lock(&self.tasks).push(tokio::spawn(future));
    }
}

impl Drop for TerminationWatcher {
    fn drop(&mut self) {
        for task in lock(&self.tasks).drain(..) {
            task.abort();
        }
    }
}
