//! Settings for a modular input run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Configuration for `ModularInputRunner`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum number of queued events; `None` for an unbounded queue
    pub queue_capacity: Option<usize>,
    /// Install Ctrl-C / SIGTERM / SIGHUP handlers
    pub watch_signals: bool,
    /// Poll for the parent process going away
    pub watch_parent: bool,
    /// How often the parent process is checked
    #[serde(rename = "parent_poll_interval_ms", with = "duration_millis")]
    pub parent_poll_interval: Duration,
    /// How long streaming tasks may keep running after a shutdown request
    /// before they are aborted
    #[serde(rename = "shutdown_grace_ms", with = "duration_millis")]
    pub shutdown_grace: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            queue_capacity: None,
            watch_signals: true,
            watch_parent: true,
            parent_poll_interval: Duration::from_secs(1),
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

impl RuntimeConfig {
    /// Bound the event queue.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    /// Enable or disable OS signal handlers.
    pub fn with_signal_watch(mut self, enabled: bool) -> Self {
        self.watch_signals = enabled;
        self
    }

    /// Enable or disable parent process polling.
    pub fn with_parent_watch(mut self, enabled: bool) -> Self {
        self.watch_parent = enabled;
        self
    }

    /// Set the parent process polling interval.
    pub fn with_parent_poll_interval(mut self, interval: Duration) -> Self {
        self.parent_poll_interval = interval;
        self
    }

    /// Set the grace period granted to streaming tasks after a shutdown request.
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }
}
