//! XML Schema conformance checking
//!
//! A thin, stateless layer over [`LibXml2Wrapper`]: compile a schema once,
//! then validate any number of in-memory documents against it. The validator
//! knows nothing about contacts or codecs; it only sees bytes.

use tracing::debug;

use crate::error::ValidationError;
use crate::libxml2::{LibXml2Wrapper, ValidationResult, XmlSchemaPtr};

/// The address-book schema shipped with the crate
pub const CONTACT_SCHEMA: &str = include_str!("../schemas/contact.xsd");

/// Factory for compiled schemas
#[derive(Default)]
pub struct SchemaValidator {
    libxml2: LibXml2Wrapper,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self {
            libxml2: LibXml2Wrapper::new(),
        }
    }

    /// Compile a schema document (XSD) held in memory
    pub fn compile(&self, schema: &[u8]) -> Result<CompiledSchema, ValidationError> {
        let schema = self.libxml2.parse_schema_from_memory(schema)?;
        Ok(CompiledSchema { schema })
    }

    /// Compile the bundled address-book schema
    pub fn contact_schema(&self) -> Result<CompiledSchema, ValidationError> {
        self.compile(CONTACT_SCHEMA.as_bytes())
    }
}

/// A schema ready to validate documents; cheap to clone
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    schema: XmlSchemaPtr,
}

impl CompiledSchema {
    /// Check a document against this schema
    ///
    /// # Errors
    ///
    /// - `ValidationError::DocumentParse` if the bytes are not well-formed XML
    /// - `ValidationError::Invalid` with every diagnostic libxml2 reported
    /// - `ValidationError::Internal` if libxml2 fails internally
    pub fn validate(&self, xml: &[u8]) -> Result<(), ValidationError> {
        let libxml2 = LibXml2Wrapper::new();
        let document = libxml2.parse_document_from_memory(xml)?;

        match libxml2.validate_document(&self.schema, &document)? {
            ValidationResult::Valid => {
                debug!("document conforms to schema");
                Ok(())
            }
            ValidationResult::Invalid {
                error_count,
                mut errors,
            } => {
                debug!(error_count, "document failed schema validation");
                if errors.is_empty() {
                    errors.push(format!(
                        "{} schema violation(s) reported without details",
                        error_count
                    ));
                }
                Err(ValidationError::Invalid { errors })
            }
            ValidationResult::InternalError { code } => Err(ValidationError::Internal {
                details: format!("validation returned code {}", code),
            }),
        }
    }
}

/// Validate `xml` against `schema` in one call
pub fn validate(schema: &[u8], xml: &[u8]) -> Result<(), ValidationError> {
    SchemaValidator::new().compile(schema)?.validate(xml)
}
