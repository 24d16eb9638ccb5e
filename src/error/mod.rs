//! Error types for the modular input runtime.
//!
//! This module provides:
//! - `ParameterError`: A typed conversion of a configuration parameter failed
//! - `XmlError`: Host XML could not be read or a document could not be written
//! - `WriterError`: Misuse or failure of the `EventWriter`
//! - `ModularInputError`: Anything that aborts a dispatcher run

use std::fmt;

use thiserror::Error;

/// Error type returned by user supplied callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shape of a configuration parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterShape {
    /// A `<param>` element holding one value
    Single,
    /// A `<param_list>` element holding zero or more values
    Multi,
}

impl fmt::Display for ParameterShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterShape::Single => write!(f, "single-value"),
            ParameterShape::Multi => write!(f, "multi-value"),
        }
    }
}

/// Errors raised while converting a parameter to a typed value.
///
/// `WrongShape` means the caller asked a single-value parameter for a list
/// (or the reverse); `InvalidValue` means the shape matched but the text
/// does not parse as the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("parameter '{name}' is {found}, not {expected}")]
    WrongShape {
        name: String,
        expected: ParameterShape,
        found: ParameterShape,
    },

    #[error("parameter '{name}': cannot convert '{value}' to {target}")]
    InvalidValue {
        name: String,
        value: String,
        target: &'static str,
    },
}

/// Errors reading host XML or writing protocol documents.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The host document did not match the expected layout
    #[error("malformed XML document: {0}")]
    De(#[from] quick_xml::DeError),

    /// A document could not be serialized
    #[error("XML serialization failed: {0}")]
    Se(#[from] quick_xml::SeError),

    /// Writing XML into a buffer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document parsed but violates the protocol
    #[error("invalid document: {0}")]
    Invalid(String),
}

/// Errors from the `EventWriter`.
#[derive(Debug, Error)]
pub enum WriterError {
    /// The writer was used after `complete` finished
    #[error("event writer has already completed")]
    Completed,

    /// Writing to the output or error stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An event could not be rendered
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// The background consumer task panicked or was aborted
    #[error("event writer task failed: {0}")]
    Task(String),
}

/// Errors that abort a dispatcher run.
#[derive(Debug, Error)]
pub enum ModularInputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error(transparent)]
    Writer(#[from] WriterError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// A validation callback failed (as opposed to rejecting the input)
    #[error("validation failed: {0}")]
    Validation(#[source] BoxError),

    /// A streaming task returned an error
    #[error("streaming stanza '{stanza}' failed: {source}")]
    Stream {
        stanza: String,
        #[source]
        source: BoxError,
    },

    /// A spawned task panicked or was cancelled
    #[error("task failed: {0}")]
    Task(String),
}

#[cfg(feature = "miette")]
mod miette_impl;

#[cfg(feature = "miette")]
pub use miette_impl::*;
