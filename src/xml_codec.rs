//! XML address-book codec
//!
//! Documents have an `AddressBook` root with one `Contact` element per record.
//! Field elements follow [`Field::ALL`] order. Unlike the JSON form, an absent
//! optional field produces no element at all, while a present empty one is
//! written as `<Tag></Tag>`.
//!
//! Carriage returns are written as `&#13;` since parsers fold raw ones into
//! `\n`. Characters XML 1.0 cannot carry at all fail encoding.

use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use roxmltree::{Document, Node, ParsingOptions};
use tracing::debug;

use crate::codec::{Format, RecordCodec};
use crate::contact::{Contact, ContactBuilder, Field};
use crate::error::{CodecError, CodecResult};

/// Root element of an address-book document
pub const ROOT_TAG: &str = "AddressBook";

/// Element wrapping one record
pub const CONTACT_TAG: &str = "Contact";

/// Encoder/decoder between contacts and an indented XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlCodec {
    indent: usize,
    trim_text: bool,
}

impl XmlCodec {
    pub fn new() -> Self {
        Self::with_indent(2)
    }

    pub fn with_indent(indent: usize) -> Self {
        Self {
            indent,
            trim_text: false,
        }
    }

    /// Trim leading and trailing whitespace from field text when decoding
    ///
    /// Off by default, so values round-trip verbatim. Useful for hand-edited
    /// files that wrap field text onto separate lines.
    pub fn with_trimmed_text(mut self, trim_text: bool) -> Self {
        self.trim_text = trim_text;
        self
    }

    /// Encode contacts as an `AddressBook` document
    pub fn encode(&self, contacts: &[Contact]) -> CodecResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', self.indent);

        write(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;
        write(&mut writer, Event::Start(BytesStart::new(ROOT_TAG)))?;
        for contact in contacts {
            write_contact(&mut writer, contact)?;
        }
        write(&mut writer, Event::End(BytesEnd::new(ROOT_TAG)))?;

        let mut document = String::from_utf8(writer.into_inner()).map_err(|e| {
            CodecError::Serialize {
                format: Format::Xml,
                details: e.to_string(),
            }
        })?;
        document.push('\n');
        Ok(document)
    }

    /// Decode every `Contact` element, in document order and at any depth
    pub fn decode(&self, input: &[u8]) -> CodecResult<Vec<Contact>> {
        let text = std::str::from_utf8(input).map_err(|e| CodecError::DocumentParse {
            format: Format::Xml,
            details: e.to_string(),
        })?;

        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let document =
            Document::parse_with_options(text, options).map_err(|e| CodecError::DocumentParse {
                format: Format::Xml,
                details: e.to_string(),
            })?;

        let contacts = document
            .descendants()
            .filter(|node| node.is_element() && node.tag_name().name() == CONTACT_TAG)
            .enumerate()
            .map(|(index, node)| self.decode_contact(index, node))
            .collect::<CodecResult<Vec<_>>>()?;

        debug!(count = contacts.len(), "decoded contacts from XML");
        Ok(contacts)
    }

    fn decode_contact(&self, index: usize, node: Node<'_, '_>) -> CodecResult<Contact> {
        let mut builder = ContactBuilder::new(String::new());
        for field in Field::ALL {
            let value = match find_child(node, field.xml_tag()) {
                Some(element) => Some(self.element_text(element)),
                None if field.is_optional() => None,
                None => {
                    return Err(CodecError::FieldMissing {
                        index,
                        field: field.xml_tag(),
                    });
                }
            };
            builder = builder.set(field, value);
        }
        Ok(builder.build())
    }

    /// Concatenated text children of an element; empty when it has none
    fn element_text(&self, element: Node<'_, '_>) -> String {
        let text: String = element
            .children()
            .filter(|child| child.is_text())
            .filter_map(|child| child.text())
            .collect();

        if self.trim_text {
            text.trim().to_string()
        } else {
            text
        }
    }
}

impl Default for XmlCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordCodec for XmlCodec {
    fn format(&self) -> Format {
        Format::Xml
    }

    fn encode(&self, contacts: &[Contact]) -> CodecResult<String> {
        XmlCodec::encode(self, contacts)
    }

    fn decode(&self, input: &[u8]) -> CodecResult<Vec<Contact>> {
        XmlCodec::decode(self, input)
    }
}

fn write_contact(writer: &mut Writer<Vec<u8>>, contact: &Contact) -> CodecResult<()> {
    write(writer, Event::Start(BytesStart::new(CONTACT_TAG)))?;
    for field in Field::ALL {
        // absent optional fields get no element
        if let Some(value) = contact.get(field) {
            if let Some(c) = value.chars().find(|&c| !is_xml_char(c)) {
                return Err(CodecError::Serialize {
                    format: Format::Xml,
                    details: format!(
                        "contact '{}' has a character XML cannot represent ({:?}) in {}",
                        contact.customer_id(),
                        c,
                        field.xml_tag()
                    ),
                });
            }
            let text = escape(value).replace('\r', "&#13;");
            write(writer, Event::Start(BytesStart::new(field.xml_tag())))?;
            write(writer, Event::Text(BytesText::from_escaped(text)))?;
            write(writer, Event::End(BytesEnd::new(field.xml_tag())))?;
        }
    }
    write(writer, Event::End(BytesEnd::new(CONTACT_TAG)))
}

/// The XML 1.0 `Char` production
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> CodecResult<()> {
    writer
        .write_event(event)
        .map_err(|e| CodecError::Serialize {
            format: Format::Xml,
            details: e.to_string(),
        })
}

fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}
