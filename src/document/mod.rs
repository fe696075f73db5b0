//! Mutable SVG document model
//!
//! The document is kept as the owned quick-xml event list it was read from,
//! so serializing writes back everything that was not edited: declaration,
//! doctype, comments and text are reproduced as they were.

pub mod style;

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

/// Errors that can occur when reading or writing a document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("failed to write document: {0}")]
    Write(String),
}

/// Handle to an element of an [`SvgDocument`]
///
/// Handles stay valid for the lifetime of the document: editing attributes
/// never adds or removes elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct SvgDocument {
    events: Vec<Event<'static>>,
}

impl SvgDocument {
    /// Parse a document from XML text
    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(xml);
        let mut events = Vec::new();
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(event) => events.push(event.into_owned()),
                Err(e) => {
                    return Err(DocumentError::Malformed {
                        position: reader.buffer_position() as u64,
                        message: e.to_string(),
                    })
                }
            }
        }
        Ok(Self { events })
    }

    /// Read and parse a document from a file
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let xml = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&xml)
    }

    fn start(&self, node: NodeId) -> Option<&BytesStart<'static>> {
        match self.events.get(node.0) {
            Some(Event::Start(start)) | Some(Event::Empty(start)) => Some(start),
            _ => None,
        }
    }

    /// All elements in document order
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.events
            .iter()
            .enumerate()
            .filter(|(_, event)| matches!(event, Event::Start(_) | Event::Empty(_)))
            .map(|(i, _)| NodeId(i))
    }

    /// Local name of an element, without namespace prefix
    pub fn element_name(&self, node: NodeId) -> Option<Cow<'_, str>> {
        self.start(node)
            .map(|start| String::from_utf8_lossy(start.local_name().into_inner()))
    }

    /// Value of an attribute, matched by local name
    ///
    /// `label` finds `inkscape:label`, `groupmode` finds `inkscape:groupmode`.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.start(node)?
            .attributes()
            .flatten()
            .find(|attr| attr.key.local_name().as_ref() == name.as_bytes())
            .and_then(|attr| attr.unescape_value().ok().map(Cow::into_owned))
    }

    /// First element in document order whose attribute `name` equals `value`
    ///
    /// This is a linear scan over the document.
    pub fn find_element_by_attribute(&self, name: &str, value: &str) -> Option<NodeId> {
        self.elements()
            .find(|&node| self.attribute(node, name).as_deref() == Some(value))
    }

    /// Set an attribute, replacing it in place or appending it if absent
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(old) = self.start(node) else {
            return;
        };
        let qname = String::from_utf8_lossy(old.name().as_ref()).into_owned();
        let mut updated = BytesStart::new(qname);
        let mut replaced = false;
        for attr in old.attributes().flatten() {
            if !replaced && attr.key.local_name().as_ref() == name.as_bytes() {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                updated.push_attribute((key.as_str(), value));
                replaced = true;
            } else {
                updated.push_attribute(attr);
            }
        }
        if !replaced {
            updated.push_attribute((name, value));
        }
        let updated = updated.into_owned();
        if let Some(event) = self.events.get_mut(node.0) {
            let empty = matches!(event, Event::Empty(_));
            *event = if empty {
                Event::Empty(updated)
            } else {
                Event::Start(updated)
            };
        }
    }

    /// Serialize the current document state
    pub fn write_to<W: Write>(&self, out: W) -> Result<(), DocumentError> {
        let mut writer = Writer::new(out);
        for event in &self.events {
            writer
                .write_event(event.borrow())
                .map_err(|e| DocumentError::Write(e.to_string()))?;
        }
        Ok(())
    }

    /// Serialize the current document state into a string
    pub fn to_xml(&self) -> Result<String, DocumentError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        String::from_utf8(buf).map_err(|e| DocumentError::Write(e.to_string()))
    }
}
