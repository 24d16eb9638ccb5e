//! Tests for the miette diagnostic wrapper.

use miette::{Diagnostic, Severity};

use crate::error::{InputDiagnostic, ModularInputError, XmlError};

#[test]
fn xml_errors_carry_help() {
    let diagnostic = InputDiagnostic::from(ModularInputError::from(XmlError::Invalid("x".into())));
    assert_eq!(diagnostic.severity, Severity::Error);
    assert!(diagnostic.help().is_some());
    assert_eq!(diagnostic.message, "invalid document: x");
}

#[test]
fn validation_faults_are_warnings() {
    let diagnostic = InputDiagnostic::from(ModularInputError::Validation("down".into()));
    assert_eq!(diagnostic.severity(), Some(Severity::Warning));
    assert!(diagnostic.help.is_none());
}

#[test]
fn converts_into_a_report() {
    let report: miette::Report = ModularInputError::Task("panicked".into()).into();
    assert_eq!(report.to_string(), "task failed: panicked");
}
