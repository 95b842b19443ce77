//! File-level conversion pipeline
//!
//! Reads a document, decodes it with the source codec, optionally validates
//! the XML side, encodes with the destination codec and writes the result to
//! a collision-free path in the output directory.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::codec::Format;
use crate::config::Config;
use crate::error::Result;
use crate::file_discovery::{FileDiscovery, check_extension, unique_output_path};
use crate::schema_loader::{SchemaLoader, SchemaSource};
use crate::validator::SchemaValidator;

/// One conversion request
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Existing input document
    pub input: PathBuf,
    /// Format of the input document
    pub from: Format,
    /// Output file name; derived from the input when absent
    pub output_name: Option<String>,
    /// Validate produced XML before writing
    pub validate: bool,
}

impl ConversionRequest {
    pub fn new(input: impl Into<PathBuf>, from: Format) -> Self {
        Self {
            input: input.into(),
            from,
            output_name: None,
            validate: false,
        }
    }

    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

/// Runs conversions and validations against the configured directories
pub struct Converter {
    config: Config,
    discovery: FileDiscovery,
    schema_loader: SchemaLoader,
    validator: SchemaValidator,
}

impl Converter {
    pub fn new(config: Config) -> Self {
        let discovery = FileDiscovery::new(config.paths.input_dir.clone());
        let schema_loader = SchemaLoader::new(config.paths.schema.clone());
        Self {
            config,
            discovery,
            schema_loader,
            validator: SchemaValidator::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn discovery(&self) -> &FileDiscovery {
        &self.discovery
    }

    /// Convert one file and return the path written
    pub async fn convert(&self, request: &ConversionRequest) -> Result<PathBuf> {
        let to = request.from.other();
        let output_name = match &request.output_name {
            Some(name) => {
                check_extension(name, to)?;
                name.clone()
            }
            None => default_output_name(&request.input, to),
        };

        debug!(input = %request.input.display(), from = %request.from, to = %to, "converting");
        let bytes = fs::read(&request.input).await?;

        let options = self.config.codec_options();
        let contacts = request.from.codec(&options).decode(&bytes)?;
        debug!(count = contacts.len(), "decoded contacts");

        let encoded = to.codec(&options).encode(&contacts)?;

        if request.validate && to == Format::Xml {
            let source = self
                .schema_loader
                .resolve(&request.input, encoded.as_bytes())?;
            self.validate_bytes(&source, encoded.as_bytes()).await?;
        }

        let output_dir = &self.config.paths.output_dir;
        fs::create_dir_all(output_dir).await?;
        let path = unique_output_path(output_dir, &output_name, to.extension()).await?;
        fs::write(&path, encoded).await?;

        info!(path = %path.display(), contacts = contacts.len(), "wrote converted file");
        Ok(path)
    }

    /// Validate an XML file against its resolved schema
    ///
    /// Returns the schema source the document was checked against.
    pub async fn validate_file(&self, input: &Path) -> Result<SchemaSource> {
        let bytes = fs::read(input).await?;
        let source = self.schema_loader.resolve(input, &bytes)?;
        debug!(input = %input.display(), schema = %source, "validating");

        self.validate_bytes(&source, &bytes).await?;
        Ok(source)
    }

    async fn validate_bytes(&self, source: &SchemaSource, xml: &[u8]) -> Result<()> {
        let schema = self.schema_loader.load(source).await?;
        let compiled = self.validator.compile(&schema)?;
        compiled.validate(xml)?;
        Ok(())
    }
}

/// Input file stem with the destination extension
pub fn default_output_name(input: &Path, to: Format) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "contacts".to_string());
    format!("{}.{}", stem, to.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, CodecError, ValidationError};
    use tempfile::TempDir;

    const BOOK_JSON: &str = r#"[
  {
    "customerId": "ALFKI",
    "companyName": "Alfreds Futterkiste",
    "contactName": "Maria Anders",
    "contactTitle": "Sales Representative",
    "address": "Obere Str. 57",
    "city": "Berlin",
    "email": "maria@alfreds.example",
    "region": null,
    "postalCode": "12209",
    "country": "Germany",
    "phone": "030-0074321",
    "fax": "030-0076545"
  }
]"#;

    fn converter_in(temp_dir: &TempDir) -> Converter {
        let mut config = Config::default();
        config.paths.input_dir = temp_dir.path().join("input");
        config.paths.output_dir = temp_dir.path().join("output");
        Converter::new(config)
    }

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            default_output_name(Path::new("input/ab.xml"), Format::Json),
            "ab.json"
        );
        assert_eq!(
            default_output_name(Path::new("contacts.json"), Format::Xml),
            "contacts.xml"
        );
    }

    #[tokio::test]
    async fn test_json_to_xml_with_validation() {
        let temp_dir = TempDir::new().unwrap();
        let converter = converter_in(&temp_dir);
        let input = temp_dir.path().join("book.json");
        fs::write(&input, BOOK_JSON).await.unwrap();

        let request = ConversionRequest::new(&input, Format::Json).validate(true);
        let path = converter.convert(&request).await.unwrap();

        assert_eq!(path, temp_dir.path().join("output").join("book.xml"));
        let written = fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("<CustomerID>ALFKI</CustomerID>"));
        assert!(!written.contains("<Region>"));
    }

    #[tokio::test]
    async fn test_repeated_conversion_does_not_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let converter = converter_in(&temp_dir);
        let input = temp_dir.path().join("book.json");
        fs::write(&input, BOOK_JSON).await.unwrap();

        let request = ConversionRequest::new(&input, Format::Json).output_name("out.xml");
        let first = converter.convert(&request).await.unwrap();
        let second = converter.convert(&request).await.unwrap();

        assert_eq!(first.file_name().unwrap(), "out.xml");
        assert_eq!(second.file_name().unwrap(), "out (1).xml");
    }

    #[tokio::test]
    async fn test_wrong_output_extension() {
        let temp_dir = TempDir::new().unwrap();
        let converter = converter_in(&temp_dir);
        let input = temp_dir.path().join("book.json");
        fs::write(&input, BOOK_JSON).await.unwrap();

        let request = ConversionRequest::new(&input, Format::Json).output_name("out.json");
        let result = converter.convert(&request).await;
        assert!(matches!(result, Err(AppError::InvalidFileExtension { .. })));
    }

    #[tokio::test]
    async fn test_decode_failure_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let converter = converter_in(&temp_dir);
        let input = temp_dir.path().join("broken.xml");
        fs::write(&input, "<AddressBook><Contact>").await.unwrap();

        let result = converter
            .convert(&ConversionRequest::new(&input, Format::Xml))
            .await;

        assert!(matches!(
            result,
            Err(AppError::Codec(CodecError::DocumentParse { .. }))
        ));
        assert!(!temp_dir.path().join("output").join("broken.json").exists());
    }

    #[tokio::test]
    async fn test_validate_file_reports_violations() {
        let temp_dir = TempDir::new().unwrap();
        let converter = converter_in(&temp_dir);
        let input = temp_dir.path().join("bad.xml");
        fs::write(
            &input,
            "<AddressBook><Contact><CustomerID>X</CustomerID></Contact></AddressBook>",
        )
        .await
        .unwrap();

        let result = converter.validate_file(&input).await;
        assert!(matches!(
            result,
            Err(AppError::Validation(ValidationError::Invalid { .. }))
        ));
    }
}
