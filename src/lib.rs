//! # addressbook-convert Library
//!
//! Converts contact address books between a JSON array representation and an
//! XML `AddressBook` document, and validates XML against an XSD schema through
//! libxml2.
//!
//! The core (record model, codecs, validator) is synchronous and never touches
//! the filesystem; the driver modules layer file discovery, configuration and
//! an interactive menu on top.

pub mod cli;
pub mod codec;
pub mod config;
pub mod contact;
pub mod convert;
pub mod error;
pub mod error_reporter;
pub mod file_discovery;
pub mod json_codec;
pub mod libxml2;
pub mod menu;
pub mod output;
pub mod schema_loader;
pub mod validator;
pub mod xml_codec;

pub use cli::{Cli, Command, VerbosityLevel};
pub use codec::{CodecOptions, Format, RecordCodec};
pub use config::{Config, ConfigError, ConfigManager};
pub use contact::{Contact, ContactBuilder, Field};
pub use convert::{ConversionRequest, Converter};
pub use error::{AppError, CodecError, ValidationError};
pub use error_reporter::ErrorReporter;
pub use file_discovery::{FileDiscovery, unique_output_path};
pub use json_codec::JsonCodec;
pub use libxml2::{LibXml2Wrapper, ValidationResult, XmlSchemaPtr};
pub use menu::Menu;
pub use output::Output;
pub use schema_loader::{SchemaLoader, SchemaSource};
pub use validator::{CONTACT_SCHEMA, CompiledSchema, SchemaValidator, validate};
pub use xml_codec::XmlCodec;
