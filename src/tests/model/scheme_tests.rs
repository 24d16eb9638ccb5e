//! Tests for the `<scheme>` document.

use serde::Deserialize;

use crate::format::from_xml_str;
use crate::{Argument, DataType, Parameter, Scheme, SingleValueParameter, StreamingMode, ValidationOutcome};

#[derive(Debug, Deserialize)]
struct SchemeDoc {
    title: String,
    description: Option<String>,
    use_external_validation: bool,
    use_single_instance: bool,
    streaming_mode: String,
    endpoint: EndpointDoc,
}

#[derive(Debug, Deserialize)]
struct EndpointDoc {
    args: ArgsDoc,
}

#[derive(Debug, Deserialize)]
struct ArgsDoc {
    #[serde(default)]
    arg: Vec<ArgDoc>,
}

#[derive(Debug, Deserialize)]
struct ArgDoc {
    #[serde(rename = "@name")]
    name: String,
    title: Option<String>,
    description: Option<String>,
    validation: Option<String>,
    data_type: String,
    required_on_edit: bool,
    required_on_create: bool,
}

fn sample() -> Scheme {
    Scheme::new("Random numbers")
        .with_description("Generates events containing a random number.")
        .with_streaming_mode(StreamingMode::Xml)
        .add_argument(
            Argument::new("min")
                .with_title("Minimum")
                .with_description("Smallest number to generate")
                .with_data_type(DataType::Number)
                .required_on_create(true),
        )
        .add_argument(
            Argument::new("max")
                .with_validation("is_pos_int('max')")
                .with_data_type(DataType::Number)
                .required_on_edit(true)
                .required_on_create(true),
        )
}

#[test]
fn new_scheme_defaults() {
    let scheme = Scheme::new("t");
    assert!(scheme.use_external_validation);
    assert!(!scheme.use_single_instance);
    assert_eq!(scheme.streaming_mode, StreamingMode::Xml);
    assert!(scheme.arguments.is_empty());
}

#[test]
fn scheme_document_carries_every_field() {
    let xml = sample().to_xml().unwrap();
    assert!(xml.starts_with("<scheme>"));

    let doc: SchemeDoc = from_xml_str(&xml).unwrap();
    assert_eq!(doc.title, "Random numbers");
    assert_eq!(
        doc.description.as_deref(),
        Some("Generates events containing a random number.")
    );
    assert!(doc.use_external_validation);
    assert!(!doc.use_single_instance);
    assert_eq!(doc.streaming_mode, "xml");

    let args = doc.endpoint.args.arg;
    assert_eq!(args.len(), 2);
    assert_eq!(args[0].name, "min");
    assert_eq!(args[0].title.as_deref(), Some("Minimum"));
    assert_eq!(args[0].description.as_deref(), Some("Smallest number to generate"));
    assert_eq!(args[0].validation, None);
    assert_eq!(args[0].data_type, "number");
    assert!(!args[0].required_on_edit);
    assert!(args[0].required_on_create);

    assert_eq!(args[1].name, "max");
    assert_eq!(args[1].title, None);
    assert_eq!(args[1].validation.as_deref(), Some("is_pos_int('max')"));
    assert!(args[1].required_on_edit);
}

#[test]
fn optional_elements_are_omitted() {
    let xml = Scheme::new("bare")
        .with_streaming_mode(StreamingMode::Simple)
        .add_argument(Argument::new("only"))
        .to_xml()
        .unwrap();
    assert!(!xml.contains("<description>"));
    assert!(!xml.contains("<title></title>"));
    assert!(xml.contains("<streaming_mode>simple</streaming_mode>"));
    assert!(xml.contains("<data_type>string</data_type>"));
}

#[test]
fn argument_lookup_and_delegate() {
    let scheme = Scheme::new("t").add_argument(Argument::new("count").with_validation_delegate(
        |p: &Parameter| match p.to_i32() {
            Ok(n) if n > 0 => ValidationOutcome::Accepted,
            _ => ValidationOutcome::reject("count must be positive"),
        },
    ));

    let delegate = scheme
        .argument("count")
        .and_then(|a| a.validation_delegate.as_ref())
        .unwrap();
    assert!(delegate.check(&SingleValueParameter::new("count", "3").into()).is_accepted());
    assert_eq!(
        delegate.check(&SingleValueParameter::new("count", "0").into()),
        ValidationOutcome::Rejected("count must be positive".into())
    );
    assert!(scheme.argument("other").is_none());
}
