//! Miette integration for pretty error reporting.

use miette::{Diagnostic, Severity};
use thiserror::Error;

use super::{ModularInputError, WriterError};

/// A diagnostic wrapper for dispatcher errors compatible with miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct InputDiagnostic {
    /// The error message
    pub message: String,

    #[source]
    /// The underlying error source
    pub source: Option<ModularInputError>,

    #[help]
    /// Help text for the user
    pub help: Option<String>,

    #[diagnostic(severity)]
    /// Severity level
    pub severity: Severity,
}

fn help_for(e: &ModularInputError) -> Option<String> {
    match e {
        ModularInputError::Xml(_) => {
            Some("Check the XML document the host passed on stdin".into())
        }
        ModularInputError::Parameter(_) => Some(
            "Read the parameter with the shape declared in the scheme (param vs param_list)".into(),
        ),
        ModularInputError::Writer(WriterError::Completed) => {
            Some("Events must be queued before the writer completes".into())
        }
        ModularInputError::Stream { .. } => {
            Some("The streaming callback for this stanza returned an error".into())
        }
        _ => None,
    }
}

impl From<ModularInputError> for InputDiagnostic {
    fn from(e: ModularInputError) -> Self {
        let severity = match e {
            ModularInputError::Validation(_) => Severity::Warning,
            _ => Severity::Error,
        };
        InputDiagnostic {
            message: e.to_string(),
            help: help_for(&e),
            source: Some(e),
            severity,
        }
    }
}

impl From<ModularInputError> for miette::Report {
    fn from(e: ModularInputError) -> Self {
        miette::Report::new(InputDiagnostic::from(e))
    }
}
