//! JSON array codec
//!
//! Each contact becomes one JSON object keyed by [`Field::json_key`]. Absent
//! optional fields are written as `null`.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::codec::{Format, RecordCodec};
use crate::contact::{Contact, ContactBuilder, Field};
use crate::error::{CodecError, CodecResult};

/// Encoder/decoder between contacts and a pretty-printed JSON array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonCodec {
    indent: usize,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::with_indent(2)
    }

    pub fn with_indent(indent: usize) -> Self {
        Self { indent }
    }

    /// Encode contacts as an indented JSON array, keys in declaration order
    pub fn encode(&self, contacts: &[Contact]) -> CodecResult<String> {
        let indent = " ".repeat(self.indent);
        let mut buffer = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(
            &mut buffer,
            PrettyFormatter::with_indent(indent.as_bytes()),
        );

        contacts
            .serialize(&mut serializer)
            .map_err(|e| CodecError::Serialize {
                format: Format::Json,
                details: e.to_string(),
            })?;

        String::from_utf8(buffer).map_err(|e| CodecError::Serialize {
            format: Format::Json,
            details: e.to_string(),
        })
    }

    /// Decode a JSON array of contact objects
    pub fn decode(&self, input: &[u8]) -> CodecResult<Vec<Contact>> {
        let value: Value =
            serde_json::from_slice(input).map_err(|e| CodecError::DocumentParse {
                format: Format::Json,
                details: e.to_string(),
            })?;

        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(CodecError::RecordShape {
                    index: None,
                    details: format!("expected a JSON array, found {}", kind(&other)),
                });
            }
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| decode_contact(index, item))
            .collect()
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordCodec for JsonCodec {
    fn format(&self) -> Format {
        Format::Json
    }

    fn encode(&self, contacts: &[Contact]) -> CodecResult<String> {
        JsonCodec::encode(self, contacts)
    }

    fn decode(&self, input: &[u8]) -> CodecResult<Vec<Contact>> {
        JsonCodec::decode(self, input)
    }
}

fn decode_contact(index: usize, item: &Value) -> CodecResult<Contact> {
    let object = item.as_object().ok_or_else(|| CodecError::RecordShape {
        index: Some(index),
        details: format!("expected a JSON object, found {}", kind(item)),
    })?;

    let mut builder = ContactBuilder::new(String::new());
    for field in Field::ALL {
        let value = match object.get(field.json_key()) {
            None | Some(Value::Null) if field.is_optional() => None,
            None | Some(Value::Null) => {
                return Err(CodecError::FieldMissing {
                    index,
                    field: field.json_key(),
                });
            }
            Some(Value::String(text)) => Some(text.clone()),
            Some(other) => {
                return Err(CodecError::RecordShape {
                    index: Some(index),
                    details: format!(
                        "field '{}' must be a string, found {}",
                        field.json_key(),
                        kind(other)
                    ),
                });
            }
        };
        builder = builder.set(field, value);
    }

    Ok(builder.build())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
