//! Codec seam between the record model and the wire formats
//!
//! The driver only talks to [`RecordCodec`]; the concrete codecs never call
//! each other, so [`Contact`] is the sole intermediate representation.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::contact::Contact;
use crate::error::CodecResult;
use crate::json_codec::JsonCodec;
use crate::xml_codec::XmlCodec;

/// Paired encoder/decoder between contact collections and one wire format
pub trait RecordCodec {
    /// Wire format handled by this codec
    fn format(&self) -> Format;

    /// Serialize the collection into a human-readable document
    fn encode(&self, contacts: &[Contact]) -> CodecResult<String>;

    /// Parse a document into contacts, in document order
    fn decode(&self, input: &[u8]) -> CodecResult<Vec<Contact>>;
}

/// Supported wire formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Xml,
}

impl Format {
    /// File extension without the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
        }
    }

    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "json" => Some(Format::Json),
            "xml" => Some(Format::Xml),
            _ => None,
        }
    }

    /// The format a conversion from `self` produces
    pub fn other(self) -> Self {
        match self {
            Format::Json => Format::Xml,
            Format::Xml => Format::Json,
        }
    }

    /// Build the codec for this format
    pub fn codec(self, options: &CodecOptions) -> Box<dyn RecordCodec> {
        match self {
            Format::Json => Box::new(JsonCodec::with_indent(options.indent)),
            Format::Xml => Box::new(
                XmlCodec::with_indent(options.indent).with_trimmed_text(options.trim_text),
            ),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => f.write_str("JSON"),
            Format::Xml => f.write_str("XML"),
        }
    }
}

/// Cosmetic codec settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Spaces per nesting level in encoded output
    pub indent: usize,
    /// Trim surrounding whitespace from XML field text when decoding
    pub trim_text: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            trim_text: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("ab.xml")), Some(Format::Xml));
        assert_eq!(
            Format::from_path(Path::new("dir/contacts.JSON")),
            Some(Format::Json)
        );
        assert_eq!(Format::from_path(Path::new("notes.txt")), None);
        assert_eq!(Format::from_path(Path::new("xml")), None);
    }

    #[test]
    fn test_format_other() {
        assert_eq!(Format::Json.other(), Format::Xml);
        assert_eq!(Format::Xml.other(), Format::Json);
    }

    #[test]
    fn test_codec_factory() {
        let options = CodecOptions::default();
        assert_eq!(Format::Json.codec(&options).format(), Format::Json);
        assert_eq!(Format::Xml.codec(&options).format(), Format::Xml);
    }

    #[test]
    fn test_codec_trait_object_round_trip() {
        let contacts = vec![
            Contact::builder("BONAP")
                .company_name("Bon app'")
                .country("France")
                .region("")
                .build(),
        ];

        for format in [Format::Json, Format::Xml] {
            let codec = format.codec(&CodecOptions::default());
            let encoded = codec.encode(&contacts).unwrap();
            assert_eq!(codec.decode(encoded.as_bytes()).unwrap(), contacts);
        }
    }
}
