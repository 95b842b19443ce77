use std::path::PathBuf;

use thiserror::Error;

use crate::codec::Format;
use crate::config::ConfigError;

/// Main application error type that encompasses all driver-level failure modes
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid file extension: expected {expected}, found {actual}")]
    InvalidFileExtension { expected: String, actual: String },

    #[error("Unable to find \"{name}\" in \"{dir}\"")]
    InputNotFound { name: String, dir: PathBuf },

    #[error("No input files found in \"{dir}\" with extension .{extension}")]
    NoInputFiles { dir: PathBuf, extension: String },

    #[error("Unsupported schema location: {location} - only local schema files are supported")]
    UnsupportedSchemaLocation { location: String },
}

/// Errors raised by the record codecs
///
/// Decoding is fail-fast: the first error aborts the whole document and no
/// partial collection is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("{format} document is not well-formed: {details}")]
    DocumentParse { format: Format, details: String },

    #[error("Contact at index {index} is missing required field '{field}'")]
    FieldMissing { index: usize, field: &'static str },

    #[error("Unexpected record shape{}: {details}", location(.index))]
    RecordShape {
        index: Option<usize>,
        details: String,
    },

    #[error("Failed to write {format} document: {details}")]
    Serialize { format: Format, details: String },
}

fn location(index: &Option<usize>) -> String {
    index.map(|i| format!(" at index {i}")).unwrap_or_default()
}

/// Schema conformance errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Schema parsing error: {details}")]
    SchemaParse { details: String },

    #[error("Document parsing error: {details}")]
    DocumentParse { details: String },

    #[error("Document does not conform to the schema: {}", .errors.join("; "))]
    Invalid { errors: Vec<String> },

    #[error("LibXML2 internal error: {details}")]
    Internal { details: String },
}

impl ValidationError {
    /// Diagnostics carried by this error, one entry per reported problem
    pub fn diagnostics(&self) -> Vec<String> {
        match self {
            ValidationError::Invalid { errors } => errors.clone(),
            ValidationError::SchemaParse { details }
            | ValidationError::DocumentParse { details }
            | ValidationError::Internal { details } => vec![details.clone()],
        }
    }
}

/// LibXML2-specific error types
#[derive(Error, Debug)]
pub enum LibXml2Error {
    #[error("Schema parsing failed: {details}")]
    SchemaParseFailed { details: String },

    #[error("Document parsing failed: {details}")]
    DocumentParseFailed { details: String },

    #[error("Validation context creation failed")]
    ValidationContextCreationFailed,

    #[error("Validation failed with internal code {code}")]
    ValidationFailed { code: i32 },

    #[error("Memory allocation failed in libxml2")]
    MemoryAllocation,

    #[error("Input of {size} bytes is too large for libxml2")]
    InputTooLarge { size: usize },
}

impl From<LibXml2Error> for ValidationError {
    fn from(err: LibXml2Error) -> Self {
        match err {
            LibXml2Error::SchemaParseFailed { details } => ValidationError::SchemaParse { details },
            LibXml2Error::DocumentParseFailed { details } => {
                ValidationError::DocumentParse { details }
            }
            other => ValidationError::Internal {
                details: other.to_string(),
            },
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Codec result type alias
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// LibXML2 result type alias
pub type LibXml2Result<T> = std::result::Result<T, LibXml2Error>;
