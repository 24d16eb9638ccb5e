//! Input definitions handed over at the start of streaming mode.

use std::collections::BTreeMap;

use crate::error::XmlError;
use crate::format::from_xml_str;

use super::Parameter;
use super::raw::RawInput;

/// One configured stanza, e.g. `foobar://aaa`, with the connection details
/// of the host that launched the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDefinition {
    pub name: String,
    pub server_host: String,
    pub server_uri: String,
    pub checkpoint_directory: String,
    pub session_key: String,
    pub parameters: BTreeMap<String, Parameter>,
}

impl InputDefinition {
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }
}

/// Every stanza passed in a single invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputDefinitionCollection {
    pub stanzas: Vec<InputDefinition>,
}

impl InputDefinitionCollection {
    /// Parse the `<input>` document the host writes to stdin.
    pub fn from_xml(content: &str) -> Result<Self, XmlError> {
        let raw: RawInput = from_xml_str(content)?;
        let RawInput {
            server_host,
            server_uri,
            session_key,
            checkpoint_dir,
            configuration,
        } = raw;

        let stanzas = configuration
            .stanzas
            .into_iter()
            .map(|stanza| {
                let (name, parameters) = stanza.into_parameters();
                InputDefinition {
                    name,
                    server_host: server_host.clone(),
                    server_uri: server_uri.clone(),
                    checkpoint_directory: checkpoint_dir.clone(),
                    session_key: session_key.clone(),
                    parameters,
                }
            })
            .collect();

        Ok(Self { stanzas })
    }

    pub fn len(&self) -> usize {
        self.stanzas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stanzas.is_empty()
    }
}

impl IntoIterator for InputDefinitionCollection {
    type Item = InputDefinition;
    type IntoIter = std::vec::IntoIter<InputDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.stanzas.into_iter()
    }
}
