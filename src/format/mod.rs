//! Wire-format helpers shared by the model and the event writer.
//!
//! This module provides:
//! - `parse_bool`: Lenient boolean parsing for host supplied parameter text
//! - `from_xml_str` / `to_xml_string`: serde bridges over quick-xml
//! - `error_document`: The `<error><message>..</message></error>` reply

mod boolean;
mod xml;

pub use boolean::parse_bool;
pub use xml::{error_document, from_xml_str, to_xml_string};
