//! A single event and its `<event>` wire representation.

use std::io::Write;

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event as XmlEvent};

use crate::error::XmlError;

/// One record streamed to the host.
///
/// All fields are optional; a default `Event` is "empty" and is what the
/// writer uses in terminal progress reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub data: Option<String>,
    pub source: Option<String>,
    pub source_type: Option<String>,
    pub index: Option<String>,
    pub host: Option<String>,
    pub time: Option<DateTime<Utc>>,
    /// Marks the last fragment of an unbroken event
    pub done: bool,
    /// The host must stitch this fragment to the previous ones of the stanza
    pub unbroken: bool,
    /// Stanza the event belongs to, used by the host to demultiplex
    pub stanza: Option<String>,
}

impl Event {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::default()
        }
    }

    pub fn with_stanza(mut self, stanza: impl Into<String>) -> Self {
        self.stanza = Some(stanza.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = Some(source_type.into());
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    pub fn with_unbroken(mut self, unbroken: bool) -> Self {
        self.unbroken = unbroken;
        self
    }

    /// True for the placeholder event carried by terminal progress reports.
    pub fn is_empty(&self) -> bool {
        *self == Event::default()
    }

    /// Write the `<event>` element.
    pub fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> std::io::Result<()> {
        let mut start = BytesStart::new("event");
        if let Some(stanza) = &self.stanza {
            start.push_attribute(("stanza", stanza.as_str()));
        }
        if self.unbroken {
            start.push_attribute(("unbroken", "1"));
        }
        writer.write_event(XmlEvent::Start(start))?;

        let time = self.time.map(epoch_seconds);
        let fields = [
            ("data", self.data.as_deref()),
            ("source", self.source.as_deref()),
            ("sourcetype", self.source_type.as_deref()),
            ("index", self.index.as_deref()),
            ("host", self.host.as_deref()),
            ("time", time.as_deref()),
        ];
        for (tag, value) in fields {
            if let Some(value) = value {
                writer.write_event(XmlEvent::Start(BytesStart::new(tag)))?;
                writer.write_event(XmlEvent::Text(BytesText::new(value)))?;
                writer.write_event(XmlEvent::End(BytesEnd::new(tag)))?;
            }
        }

        if self.done {
            writer.write_event(XmlEvent::Empty(BytesStart::new("done")))?;
        }

        writer.write_event(XmlEvent::End(BytesEnd::new("event")))
    }

    /// Render the event into its own buffer.
    pub fn to_xml(&self) -> Result<Vec<u8>, XmlError> {
        let mut writer = Writer::new(Vec::new());
        self.write_xml(&mut writer)?;
        Ok(writer.into_inner())
    }
}

/// Seconds since the Unix epoch with millisecond precision, e.g. `1372274622.493`.
pub fn epoch_seconds(time: DateTime<Utc>) -> String {
    let millis = time.timestamp_millis();
    let sign = if millis < 0 { "-" } else { "" };
    let abs = millis.unsigned_abs();
    format!("{sign}{}.{:03}", abs / 1000, abs % 1000)
}
