//! The candidate configuration sent in validate-arguments mode.

use std::collections::BTreeMap;

use crate::error::XmlError;
use crate::format::from_xml_str;

use super::Parameter;
use super::raw::RawItems;

/// A stanza the host is about to create or edit, pending acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub name: String,
    pub server_host: String,
    pub server_uri: String,
    pub checkpoint_directory: String,
    pub session_key: String,
    pub parameters: BTreeMap<String, Parameter>,
}

impl Validation {
    /// Parse the `<items>` document. Exactly one `<item>` is expected.
    pub fn from_xml(content: &str) -> Result<Self, XmlError> {
        let raw: RawItems = from_xml_str(content)?;
        let count = raw.items.len();
        let item = match <[_; 1]>::try_from(raw.items) {
            Ok([item]) => item,
            Err(_) => {
                return Err(XmlError::Invalid(format!(
                    "expected exactly one <item> in validation request, found {count}"
                )));
            }
        };
        let (name, parameters) = item.into_parameters();

        Ok(Self {
            name,
            server_host: raw.server_host,
            server_uri: raw.server_uri,
            checkpoint_directory: raw.checkpoint_dir,
            session_key: raw.session_key,
            parameters,
        })
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }
}

/// Result of validating a candidate configuration.
///
/// Rejection is an expected answer, not an error: it is reported to the
/// host as an `<error>` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted,
    Rejected(String),
}

impl ValidationOutcome {
    pub fn reject(message: impl Into<String>) -> Self {
        ValidationOutcome::Rejected(message.into())
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted)
    }
}
