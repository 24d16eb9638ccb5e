//! Command line protocol of a modular input.
//!
//! The host selects one of three modes through argv:
//!
//! | argv                   | mode                |
//! |------------------------|---------------------|
//! | (none)                 | stream events       |
//! | `--scheme`             | print the scheme    |
//! | `--validate-arguments` | validate a stanza   |
//!
//! Anything else is rejected.

use std::fmt;

/// Mode selected by the process arguments (program name excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Stream,
    Scheme,
    ValidateArguments,
    Invalid,
}

impl Mode {
    pub const SCHEME_FLAG: &'static str = "--scheme";
    pub const VALIDATE_FLAG: &'static str = "--validate-arguments";

    /// Parse the arguments following the program name.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Self {
        match args {
            [] => Mode::Stream,
            [flag, ..] if flag.as_ref() == Self::SCHEME_FLAG => Mode::Scheme,
            [flag, ..] if flag.as_ref() == Self::VALIDATE_FLAG => Mode::ValidateArguments,
            _ => Mode::Invalid,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Stream => write!(f, "stream"),
            Mode::Scheme => write!(f, "scheme"),
            Mode::ValidateArguments => write!(f, "validate-arguments"),
            Mode::Invalid => write!(f, "invalid"),
        }
    }
}
