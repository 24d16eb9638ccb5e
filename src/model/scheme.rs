//! Scheme introspection: the parameters a modular input accepts.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::XmlError;
use crate::format::to_xml_string;

use super::{Parameter, ValidationOutcome};

/// How the host should read the program's stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamingMode {
    /// Plain text, one event per line
    Simple,
    /// `<stream>` documents as written by `EventWriter`
    #[default]
    Xml,
}

impl StreamingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamingMode::Simple => "simple",
            StreamingMode::Xml => "xml",
        }
    }
}

/// Declared type of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    #[default]
    String,
    Number,
    Boolean,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
        }
    }
}

/// Local check run against one parameter before `ModularInput::validate`.
#[derive(Clone)]
pub struct ValidationDelegate(Arc<dyn Fn(&Parameter) -> ValidationOutcome + Send + Sync>);

impl ValidationDelegate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Parameter) -> ValidationOutcome + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn check(&self, parameter: &Parameter) -> ValidationOutcome {
        (self.0)(parameter)
    }
}

impl fmt::Debug for ValidationDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationDelegate").finish_non_exhaustive()
    }
}

/// One parameter a modular input accepts.
#[derive(Debug, Clone, Default)]
pub struct Argument {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Free-text validation rule evaluated by the host, e.g. `is_pos_int('min')`
    pub validation: Option<String>,
    pub data_type: DataType,
    pub required_on_edit: bool,
    pub required_on_create: bool,
    pub validation_delegate: Option<ValidationDelegate>,
}

impl Argument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_validation(mut self, validation: impl Into<String>) -> Self {
        self.validation = Some(validation.into());
        self
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn required_on_edit(mut self, required: bool) -> Self {
        self.required_on_edit = required;
        self
    }

    pub fn required_on_create(mut self, required: bool) -> Self {
        self.required_on_create = required;
        self
    }

    /// Attach a check that runs in validate-arguments mode whenever the
    /// candidate configuration carries this parameter.
    pub fn with_validation_delegate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Parameter) -> ValidationOutcome + Send + Sync + 'static,
    {
        self.validation_delegate = Some(ValidationDelegate::new(f));
        self
    }
}

/// Description of a modular input returned in `--scheme` mode.
#[derive(Debug, Clone, Default)]
pub struct Scheme {
    pub title: String,
    pub description: Option<String>,
    pub use_external_validation: bool,
    pub use_single_instance: bool,
    pub streaming_mode: StreamingMode,
    pub arguments: Vec<Argument>,
}

impl Scheme {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            use_external_validation: true,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_external_validation(mut self, enabled: bool) -> Self {
        self.use_external_validation = enabled;
        self
    }

    pub fn with_single_instance(mut self, enabled: bool) -> Self {
        self.use_single_instance = enabled;
        self
    }

    pub fn with_streaming_mode(mut self, mode: StreamingMode) -> Self {
        self.streaming_mode = mode;
        self
    }

    pub fn add_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Render the `<scheme>` document.
    pub fn to_xml(&self) -> Result<String, XmlError> {
        to_xml_string(&SchemeXml::from(self))
    }
}

#[derive(Serialize)]
#[serde(rename = "scheme")]
struct SchemeXml<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    use_external_validation: bool,
    use_single_instance: bool,
    streaming_mode: &'static str,
    endpoint: EndpointXml<'a>,
}

#[derive(Serialize)]
struct EndpointXml<'a> {
    args: ArgsXml<'a>,
}

#[derive(Serialize)]
struct ArgsXml<'a> {
    arg: Vec<ArgXml<'a>>,
}

#[derive(Serialize)]
struct ArgXml<'a> {
    #[serde(rename = "@name")]
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation: Option<&'a str>,
    data_type: &'static str,
    required_on_edit: bool,
    required_on_create: bool,
}

impl<'a> From<&'a Scheme> for SchemeXml<'a> {
    fn from(scheme: &'a Scheme) -> Self {
        let arg = scheme
            .arguments
            .iter()
            .map(|a| ArgXml {
                name: &a.name,
                title: a.title.as_deref(),
                description: a.description.as_deref(),
                validation: a.validation.as_deref(),
                data_type: a.data_type.as_str(),
                required_on_edit: a.required_on_edit,
                required_on_create: a.required_on_create,
            })
            .collect();

        SchemeXml {
            title: &scheme.title,
            description: scheme.description.as_deref(),
            use_external_validation: scheme.use_external_validation,
            use_single_instance: scheme.use_single_instance,
            streaming_mode: scheme.streaming_mode.as_str(),
            endpoint: EndpointXml {
                args: ArgsXml { arg },
            },
        }
    }
}
