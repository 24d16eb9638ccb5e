//! XML helpers built on quick-xml.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::XmlError;

/// Deserialize a host document.
pub fn from_xml_str<T: DeserializeOwned>(content: &str) -> Result<T, XmlError> {
    Ok(quick_xml::de::from_str(content)?)
}

/// Serialize a value as a standalone element (no XML declaration).
pub fn to_xml_string<T: Serialize>(value: &T) -> Result<String, XmlError> {
    Ok(quick_xml::se::to_string(value)?)
}

/// Render the reply sent to the host when validation rejects an input.
pub fn error_document(message: &str) -> Result<String, XmlError> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Start(BytesStart::new("error")))?;
    writer.write_event(Event::Start(BytesStart::new("message")))?;
    writer.write_event(Event::Text(BytesText::new(message)))?;
    writer.write_event(Event::End(BytesEnd::new("message")))?;
    writer.write_event(Event::End(BytesEnd::new("error")))?;
    String::from_utf8(writer.into_inner())
        .map_err(|e| XmlError::Invalid(format!("non UTF-8 output: {e}")))
}
