//! Termination watcher tests.
