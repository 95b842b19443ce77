//! LibXML2 FFI Wrapper Module
//!
//! Safe wrapper around the small part of libxml2 needed for XML Schema
//! validation of in-memory documents.
//!
//! Everything crossing the FFI boundary is owned by RAII wrappers:
//!
//! - [`XmlSchemaPtr`] frees the compiled schema when the last clone drops
//! - [`XmlDocPtr`] frees a parsed document on drop
//! - parser and validation contexts never outlive the call that creates them
//!
//! Diagnostics are collected through libxml2's structured error callbacks
//! instead of being printed to stderr.

use std::ffi::CStr;
use std::marker::PhantomData;
use std::sync::{Arc, Once};

use libc::{c_char, c_int, c_void};

use crate::error::{LibXml2Error, LibXml2Result};

/// Global initialization flag for libxml2
///
/// libxml2's initialization functions are not thread-safe, so they run
/// exactly once behind `std::sync::Once`.
static LIBXML2_INIT: Once = Once::new();

/// Refuse network access while parsing documents
const XML_PARSE_NONET: c_int = 1 << 11;
/// Suppress default error reports (errors are still recorded)
const XML_PARSE_NOERROR: c_int = 1 << 5;
/// Suppress default warning reports
const XML_PARSE_NOWARNING: c_int = 1 << 6;

// Opaque libxml2 structures
#[repr(C)]
pub struct XmlSchema {
    _private: [u8; 0],
}

#[repr(C)]
pub struct XmlSchemaParserCtxt {
    _private: [u8; 0],
}

#[repr(C)]
pub struct XmlSchemaValidCtxt {
    _private: [u8; 0],
}

#[repr(C)]
pub struct XmlDoc {
    _private: [u8; 0],
}

#[allow(non_camel_case_types)]
#[repr(C)]
pub struct xmlError {
    pub domain: c_int,
    pub code: c_int,
    pub message: *const c_char,
    pub level: c_int,
    pub file: *const c_char,
    pub line: c_int,
    pub str1: *const c_char,
    pub str2: *const c_char,
    pub str3: *const c_char,
    pub int1: c_int,
    pub int2: c_int,
    pub ctxt: *mut c_void,
    pub node: *mut c_void,
}

pub type XmlStructuredErrorFunc =
    Option<unsafe extern "C" fn(user_data: *mut c_void, error: *mut xmlError)>;

// External libxml2 FFI declarations
#[cfg_attr(target_os = "windows", link(name = "libxml2"))]
#[cfg_attr(not(target_os = "windows"), link(name = "xml2"))]
unsafe extern "C" {
    pub fn xmlInitParser();
    pub fn xmlInitGlobals();

    // Error inspection
    pub fn xmlGetLastError() -> *const xmlError;
    pub fn xmlResetLastError();

    // Document parsing
    pub fn xmlReadMemory(
        buffer: *const c_char,
        size: c_int,
        url: *const c_char,
        encoding: *const c_char,
        options: c_int,
    ) -> *mut XmlDoc;
    pub fn xmlFreeDoc(doc: *mut XmlDoc);

    // Schema parsing functions
    pub fn xmlSchemaNewMemParserCtxt(
        buffer: *const c_char,
        size: c_int,
    ) -> *mut XmlSchemaParserCtxt;
    pub fn xmlSchemaSetParserStructuredErrors(
        ctxt: *mut XmlSchemaParserCtxt,
        serror: XmlStructuredErrorFunc,
        ctx: *mut c_void,
    );
    pub fn xmlSchemaParse(ctxt: *mut XmlSchemaParserCtxt) -> *mut XmlSchema;
    pub fn xmlSchemaFreeParserCtxt(ctxt: *mut XmlSchemaParserCtxt);
    pub fn xmlSchemaFree(schema: *mut XmlSchema);

    // Schema validation functions
    pub fn xmlSchemaNewValidCtxt(schema: *const XmlSchema) -> *mut XmlSchemaValidCtxt;
    pub fn xmlSchemaFreeValidCtxt(ctxt: *mut XmlSchemaValidCtxt);
    pub fn xmlSchemaSetValidStructuredErrors(
        ctxt: *mut XmlSchemaValidCtxt,
        serror: XmlStructuredErrorFunc,
        ctx: *mut c_void,
    );
    pub fn xmlSchemaValidateDoc(ctxt: *mut XmlSchemaValidCtxt, doc: *mut XmlDoc) -> c_int;
}

/// Render one libxml2 error as `line N: message`
///
/// # Safety
///
/// `error` must be null or point to a live `xmlError`.
unsafe fn describe_error(error: *const xmlError) -> Option<String> {
    if error.is_null() {
        return None;
    }

    let (message, line) = unsafe { ((*error).message, (*error).line) };
    if message.is_null() {
        return None;
    }

    let text = unsafe { CStr::from_ptr(message) }
        .to_string_lossy()
        .trim()
        .to_string();
    if line > 0 {
        Some(format!("line {}: {}", line, text))
    } else {
        Some(text)
    }
}

/// Callback for libxml2 to report errors (structured)
unsafe extern "C" fn structured_error_callback(user_data: *mut c_void, error: *mut xmlError) {
    let errors = unsafe { &mut *(user_data as *mut Vec<String>) };
    if let Some(message) = unsafe { describe_error(error) } {
        errors.push(message);
    }
}

fn buffer_len(data: &[u8]) -> LibXml2Result<c_int> {
    c_int::try_from(data.len()).map_err(|_| LibXml2Error::InputTooLarge { size: data.len() })
}

/// Shared, reference-counted handle to a compiled libxml2 schema
#[derive(Debug, Clone)]
pub struct XmlSchemaPtr {
    inner: Arc<XmlSchemaInner>,
}

#[derive(Debug)]
struct XmlSchemaInner {
    ptr: *mut XmlSchema,
    _phantom: PhantomData<XmlSchema>,
}

// Safety: a compiled xmlSchema is read-only during validation
// See: http://xmlsoft.org/threads.html
unsafe impl Send for XmlSchemaInner {}
unsafe impl Sync for XmlSchemaInner {}

impl XmlSchemaPtr {
    /// Wrap a raw schema pointer
    ///
    /// # Safety
    ///
    /// The pointer must come from `xmlSchemaParse` and must not be freed by
    /// anyone else.
    unsafe fn from_raw(ptr: *mut XmlSchema) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }

        Some(XmlSchemaPtr {
            inner: Arc::new(XmlSchemaInner {
                ptr,
                _phantom: PhantomData,
            }),
        })
    }

    pub(crate) fn as_ptr(&self) -> *const XmlSchema {
        self.inner.ptr
    }
}

impl Drop for XmlSchemaInner {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe {
                xmlSchemaFree(self.ptr);
            }
            self.ptr = std::ptr::null_mut();
        }
    }
}

/// Owned libxml2 document tree
#[derive(Debug)]
pub struct XmlDocPtr {
    ptr: *mut XmlDoc,
}

impl Drop for XmlDocPtr {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe {
                xmlFreeDoc(self.ptr);
            }
        }
    }
}

/// Outcome of validating a document against a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Validation succeeded (return code 0)
    Valid,
    /// Validation failed with errors (return code > 0)
    Invalid {
        error_count: i32,
        errors: Vec<String>,
    },
    /// Internal error occurred (return code < 0)
    InternalError { code: i32 },
}

impl ValidationResult {
    /// Create ValidationResult from libxml2 return code and captured errors
    pub fn from_code(code: c_int, errors: Vec<String>) -> Self {
        match code {
            0 => ValidationResult::Valid,
            n if n > 0 => ValidationResult::Invalid {
                error_count: n,
                errors,
            },
            n => ValidationResult::InternalError { code: n },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Entry point for libxml2 calls
///
/// Creating a wrapper initializes libxml2 once per process. The wrapper holds
/// no state of its own, so instances are interchangeable.
pub struct LibXml2Wrapper {
    _phantom: PhantomData<()>,
}

impl LibXml2Wrapper {
    pub fn new() -> Self {
        LIBXML2_INIT.call_once(|| unsafe {
            xmlInitParser();
            xmlInitGlobals();
        });

        LibXml2Wrapper {
            _phantom: PhantomData,
        }
    }

    /// Compile an XML schema from a memory buffer
    ///
    /// # Errors
    ///
    /// Returns `LibXml2Error::SchemaParseFailed` with the collected
    /// diagnostics if the buffer is not a usable XSD document.
    pub fn parse_schema_from_memory(&self, schema_data: &[u8]) -> LibXml2Result<XmlSchemaPtr> {
        let size = buffer_len(schema_data)?;
        let mut errors: Vec<String> = Vec::new();

        let schema_ptr = unsafe {
            let parser_ctxt =
                xmlSchemaNewMemParserCtxt(schema_data.as_ptr() as *const c_char, size);
            if parser_ctxt.is_null() {
                return Err(LibXml2Error::MemoryAllocation);
            }

            xmlSchemaSetParserStructuredErrors(
                parser_ctxt,
                Some(structured_error_callback),
                &mut errors as *mut Vec<String> as *mut c_void,
            );

            let schema_ptr = xmlSchemaParse(parser_ctxt);
            xmlSchemaFreeParserCtxt(parser_ctxt);
            schema_ptr
        };

        unsafe { XmlSchemaPtr::from_raw(schema_ptr) }.ok_or_else(|| {
            LibXml2Error::SchemaParseFailed {
                details: if errors.is_empty() {
                    "schema could not be compiled".to_string()
                } else {
                    errors.join("; ")
                },
            }
        })
    }

    /// Parse an XML document from a memory buffer
    ///
    /// Network access is disabled; external entities and DTDs are never
    /// fetched remotely.
    pub fn parse_document_from_memory(&self, xml_data: &[u8]) -> LibXml2Result<XmlDocPtr> {
        let size = buffer_len(xml_data)?;

        unsafe {
            xmlResetLastError();
            let doc = xmlReadMemory(
                xml_data.as_ptr() as *const c_char,
                size,
                c"memory.xml".as_ptr(),
                std::ptr::null(),
                XML_PARSE_NONET | XML_PARSE_NOERROR | XML_PARSE_NOWARNING,
            );

            if doc.is_null() {
                let details = describe_error(xmlGetLastError())
                    .unwrap_or_else(|| "document is not well-formed".to_string());
                return Err(LibXml2Error::DocumentParseFailed { details });
            }

            Ok(XmlDocPtr { ptr: doc })
        }
    }

    /// Validate a parsed document against a compiled schema
    ///
    /// A fresh validation context is created for every call, so one schema can
    /// serve any number of validations.
    pub fn validate_document(
        &self,
        schema: &XmlSchemaPtr,
        document: &XmlDocPtr,
    ) -> LibXml2Result<ValidationResult> {
        let mut errors: Vec<String> = Vec::new();

        let result_code = unsafe {
            let valid_ctxt = xmlSchemaNewValidCtxt(schema.as_ptr());
            if valid_ctxt.is_null() {
                return Err(LibXml2Error::ValidationContextCreationFailed);
            }

            xmlSchemaSetValidStructuredErrors(
                valid_ctxt,
                Some(structured_error_callback),
                &mut errors as *mut Vec<String> as *mut c_void,
            );

            let code = xmlSchemaValidateDoc(valid_ctxt, document.ptr);
            xmlSchemaFreeValidCtxt(valid_ctxt);
            code
        };

        match ValidationResult::from_code(result_code, errors) {
            ValidationResult::InternalError { code } => {
                Err(LibXml2Error::ValidationFailed { code })
            }
            result => Ok(result),
        }
    }
}

impl Default for LibXml2Wrapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
    <xs:element name="root" type="xs:string"/>
</xs:schema>"#;

    const VALID_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<root>Hello World</root>"#;

    const INVALID_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<root><invalid>content</invalid></root>"#;

    #[test]
    fn test_schema_parsing_success() {
        let wrapper = LibXml2Wrapper::new();
        let schema = wrapper.parse_schema_from_memory(SIMPLE_XSD.as_bytes());
        assert!(schema.is_ok());
    }

    #[test]
    fn test_schema_parsing_invalid_schema() {
        let wrapper = LibXml2Wrapper::new();
        let result = wrapper.parse_schema_from_memory(b"<invalid>not a schema</invalid>");

        match result.unwrap_err() {
            LibXml2Error::SchemaParseFailed { details } => assert!(!details.is_empty()),
            other => panic!("Expected SchemaParseFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_schema_parsing_empty_data() {
        let wrapper = LibXml2Wrapper::new();
        assert!(wrapper.parse_schema_from_memory(&[]).is_err());
    }

    #[test]
    fn test_validate_valid_document() {
        let wrapper = LibXml2Wrapper::new();
        let schema = wrapper
            .parse_schema_from_memory(SIMPLE_XSD.as_bytes())
            .unwrap();
        let document = wrapper
            .parse_document_from_memory(VALID_XML.as_bytes())
            .unwrap();

        let result = wrapper.validate_document(&schema, &document).unwrap();
        assert!(result.is_valid());
    }

    #[test]
    fn test_validate_invalid_document_collects_errors() {
        let wrapper = LibXml2Wrapper::new();
        let schema = wrapper
            .parse_schema_from_memory(SIMPLE_XSD.as_bytes())
            .unwrap();
        let document = wrapper
            .parse_document_from_memory(INVALID_XML.as_bytes())
            .unwrap();

        match wrapper.validate_document(&schema, &document).unwrap() {
            ValidationResult::Invalid {
                error_count,
                errors,
            } => {
                assert!(error_count > 0);
                assert!(!errors.is_empty());
                assert!(errors[0].contains("root"));
            }
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_malformed_document() {
        let wrapper = LibXml2Wrapper::new();
        let result = wrapper.parse_document_from_memory(b"<root><unclosed></root>");

        match result.unwrap_err() {
            LibXml2Error::DocumentParseFailed { details } => assert!(!details.is_empty()),
            other => panic!("Expected DocumentParseFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_result_from_code() {
        assert_eq!(
            ValidationResult::from_code(0, vec![]),
            ValidationResult::Valid
        );
        assert_eq!(
            ValidationResult::from_code(5, vec![]),
            ValidationResult::Invalid {
                error_count: 5,
                errors: vec![]
            }
        );
        assert_eq!(
            ValidationResult::from_code(-1, vec![]),
            ValidationResult::InternalError { code: -1 }
        );
    }

    #[test]
    fn test_schema_ptr_cloning() {
        let wrapper = LibXml2Wrapper::new();
        let schema = wrapper
            .parse_schema_from_memory(SIMPLE_XSD.as_bytes())
            .unwrap();
        let cloned_schema = schema.clone();

        assert_eq!(schema.as_ptr(), cloned_schema.as_ptr());
    }

    #[test]
    fn test_memory_safety() {
        let wrapper = LibXml2Wrapper::new();

        {
            let schema = wrapper
                .parse_schema_from_memory(SIMPLE_XSD.as_bytes())
                .unwrap();
            let document = wrapper
                .parse_document_from_memory(VALID_XML.as_bytes())
                .unwrap();
            assert!(wrapper.validate_document(&schema, &document).is_ok());
        }

        let schema2 = wrapper.parse_schema_from_memory(SIMPLE_XSD.as_bytes());
        assert!(schema2.is_ok());
    }
}
