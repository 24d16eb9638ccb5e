//! Tests for parsing the streaming-mode `<input>` document.

use crate::InputDefinitionCollection;
use crate::error::XmlError;

const INPUT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<input>
  <server_host>tiny</server_host>
  <server_uri>https://127.0.0.1:8089</server_uri>
  <session_key>123102983109283019283</session_key>
  <checkpoint_dir>/opt/splunk/var/lib/splunk/modinputs</checkpoint_dir>
  <configuration>
    <stanza name="foobar://aaa">
      <param name="param1">value1</param>
      <param name="param2">value2</param>
      <param name="disabled">0</param>
      <param name="index">default</param>
    </stanza>
    <stanza name="foobar://bbb">
      <param name="param1">value11</param>
      <param_list name="multiValue">
        <value>value1</value>
        <value>value2</value>
      </param_list>
      <param name="index">default</param>
    </stanza>
  </configuration>
</input>"#;

#[test]
fn parses_every_stanza_with_shared_connection_details() {
    let collection = InputDefinitionCollection::from_xml(INPUT).unwrap();
    assert_eq!(collection.len(), 2);

    let names: Vec<_> = collection.stanzas.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["foobar://aaa", "foobar://bbb"]);

    for stanza in &collection.stanzas {
        assert_eq!(stanza.server_host, "tiny");
        assert_eq!(stanza.server_uri, "https://127.0.0.1:8089");
        assert_eq!(stanza.session_key, "123102983109283019283");
        assert_eq!(stanza.checkpoint_directory, "/opt/splunk/var/lib/splunk/modinputs");
    }
}

#[test]
fn single_and_multi_value_parameters_are_distinguished() {
    let collection = InputDefinitionCollection::from_xml(INPUT).unwrap();
    let first = &collection.stanzas[0];
    assert_eq!(first.parameters.len(), 4);
    assert_eq!(first.parameter("param2").unwrap().as_str().unwrap(), "value2");
    assert!(!first.parameter("disabled").unwrap().to_bool().unwrap());

    let second = &collection.stanzas[1];
    assert_eq!(
        second.parameter("multiValue").unwrap().to_string_list().unwrap(),
        vec!["value1", "value2"]
    );
    assert!(second.parameter("missing").is_none());
}

#[test]
fn empty_configuration_yields_no_stanzas() {
    let collection = InputDefinitionCollection::from_xml(
        "<input><server_host>h</server_host><configuration/></input>",
    )
    .unwrap();
    assert!(collection.is_empty());
}

#[test]
fn malformed_document_is_rejected() {
    let err = InputDefinitionCollection::from_xml("<input><configuration>").unwrap_err();
    assert!(matches!(err, XmlError::De(_)));
}
