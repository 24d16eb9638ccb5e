//! Serde mirrors of the documents the host writes on stdin.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{MultiValueParameter, Parameter, SingleValueParameter};

#[derive(Debug, Deserialize)]
pub(crate) struct RawParam {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "$text", default)]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawParamList {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "value", default)]
    pub values: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) enum RawParameterNode {
    #[serde(rename = "param")]
    Param(RawParam),
    #[serde(rename = "param_list")]
    ParamList(RawParamList),
}

/// A `<stanza>` (input definition) or `<item>` (validation) element.
#[derive(Debug, Deserialize)]
pub(crate) struct RawStanza {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "$value", default)]
    pub parameters: Vec<RawParameterNode>,
}

impl RawStanza {
    pub fn into_parameters(self) -> (String, BTreeMap<String, Parameter>) {
        let parameters = self
            .parameters
            .into_iter()
            .map(|node| {
                let parameter: Parameter = match node {
                    RawParameterNode::Param(p) => SingleValueParameter::new(p.name, p.value).into(),
                    RawParameterNode::ParamList(p) => {
                        MultiValueParameter::new(p.name, p.values).into()
                    }
                };
                (parameter.name().to_string(), parameter)
            })
            .collect();
        (self.name, parameters)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawConfiguration {
    #[serde(rename = "stanza", default)]
    pub stanzas: Vec<RawStanza>,
}

/// Root `<input>` element of streaming mode.
#[derive(Debug, Deserialize)]
pub(crate) struct RawInput {
    #[serde(default)]
    pub server_host: String,
    #[serde(default)]
    pub server_uri: String,
    #[serde(default)]
    pub session_key: String,
    #[serde(default)]
    pub checkpoint_dir: String,
    #[serde(default)]
    pub configuration: RawConfiguration,
}

/// Root `<items>` element of validate-arguments mode.
#[derive(Debug, Deserialize)]
pub(crate) struct RawItems {
    #[serde(default)]
    pub server_host: String,
    #[serde(default)]
    pub server_uri: String,
    #[serde(default)]
    pub session_key: String,
    #[serde(default)]
    pub checkpoint_dir: String,
    #[serde(rename = "item", default)]
    pub items: Vec<RawStanza>,
}
