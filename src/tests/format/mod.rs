//! Format helper tests.
