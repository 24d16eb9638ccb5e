//! Event and EventWriter tests.

mod writer_tests;
