use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::validator::CONTACT_SCHEMA;

/// Cached regex for xsi:schemaLocation extraction
static SCHEMA_LOCATION_REGEX: OnceLock<Regex> = OnceLock::new();

/// Cached regex for xsi:noNamespaceSchemaLocation extraction
static NO_NAMESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_schema_location_regex() -> &'static Regex {
    SCHEMA_LOCATION_REGEX.get_or_init(|| {
        Regex::new(r#"xsi:schemaLocation\s*=\s*["']\S+\s+([^"'\s]+)"#)
            .expect("Failed to compile schemaLocation regex")
    })
}

fn get_no_namespace_regex() -> &'static Regex {
    NO_NAMESPACE_REGEX.get_or_init(|| {
        Regex::new(r#"xsi:noNamespaceSchemaLocation\s*=\s*["']([^"']+)["']"#)
            .expect("Failed to compile noNamespaceSchemaLocation regex")
    })
}

/// Where the schema for a document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// Given on the command line or in the configuration
    Explicit(PathBuf),
    /// Referenced by the document itself
    Referenced(PathBuf),
    /// The address-book schema bundled with the crate
    Bundled,
}

impl std::fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaSource::Explicit(path) | SchemaSource::Referenced(path) => {
                write!(f, "{}", path.display())
            }
            SchemaSource::Bundled => f.write_str("bundled contact schema"),
        }
    }
}

/// Extract the schema location declared on a document, if any
///
/// `xsi:noNamespaceSchemaLocation` wins over the location half of an
/// `xsi:schemaLocation` pair.
pub fn extract_schema_location(document: &str) -> Option<String> {
    get_no_namespace_regex()
        .captures(document)
        .or_else(|| get_schema_location_regex().captures(document))
        .map(|caps| caps[1].to_owned())
}

/// Resolves and loads the schema a document is validated against
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader {
    explicit: Option<PathBuf>,
}

impl SchemaLoader {
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    /// Pick the schema source: explicit path, then document reference, then bundled
    pub fn resolve(&self, document_path: &Path, document: &[u8]) -> Result<SchemaSource> {
        if let Some(path) = &self.explicit {
            return Ok(SchemaSource::Explicit(path.clone()));
        }

        let text = String::from_utf8_lossy(document);
        let Some(location) = extract_schema_location(&text) else {
            return Ok(SchemaSource::Bundled);
        };

        if location.starts_with("http://") || location.starts_with("https://") {
            return Err(AppError::UnsupportedSchemaLocation { location });
        }

        let location = location.strip_prefix("file://").unwrap_or(&location);
        let base = document_path.parent().unwrap_or_else(|| Path::new(""));
        Ok(SchemaSource::Referenced(base.join(location)))
    }

    /// Read the schema bytes for a resolved source
    pub async fn load(&self, source: &SchemaSource) -> Result<Vec<u8>> {
        match source {
            SchemaSource::Explicit(path) | SchemaSource::Referenced(path) => {
                debug!(schema = %path.display(), "loading schema");
                Ok(tokio::fs::read(path).await?)
            }
            SchemaSource::Bundled => Ok(CONTACT_SCHEMA.as_bytes().to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extract_no_namespace_location() {
        let xml = r#"<AddressBook xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
  xsi:noNamespaceSchemaLocation="schemas/contact.xsd">"#;
        assert_eq!(
            extract_schema_location(xml),
            Some("schemas/contact.xsd".to_string())
        );
    }

    #[test]
    fn test_extract_schema_location_pair() {
        let xml = r#"<AddressBook xsi:schemaLocation="urn:contacts contacts.xsd">"#;
        assert_eq!(extract_schema_location(xml), Some("contacts.xsd".to_string()));
    }

    #[test]
    fn test_extract_none() {
        assert_eq!(extract_schema_location("<AddressBook/>"), None);
    }

    #[test]
    fn test_explicit_schema_wins() {
        let loader = SchemaLoader::new(Some(PathBuf::from("/etc/custom.xsd")));
        let xml = br#"<AddressBook xsi:noNamespaceSchemaLocation="other.xsd"/>"#;

        let source = loader.resolve(Path::new("input/ab.xml"), xml).unwrap();
        assert_eq!(source, SchemaSource::Explicit(PathBuf::from("/etc/custom.xsd")));
    }

    #[test]
    fn test_referenced_schema_is_relative_to_document() {
        let loader = SchemaLoader::default();
        let xml = br#"<AddressBook xsi:noNamespaceSchemaLocation="contact.xsd"/>"#;

        let source = loader.resolve(Path::new("input/ab.xml"), xml).unwrap();
        assert_eq!(
            source,
            SchemaSource::Referenced(PathBuf::from("input/contact.xsd"))
        );
    }

    #[test]
    fn test_bundled_fallback() {
        let loader = SchemaLoader::default();
        let source = loader.resolve(Path::new("ab.xml"), b"<AddressBook/>").unwrap();
        assert_eq!(source, SchemaSource::Bundled);
    }

    #[test]
    fn test_remote_location_rejected() {
        let loader = SchemaLoader::default();
        let xml = br#"<AddressBook xsi:noNamespaceSchemaLocation="https://example.com/c.xsd"/>"#;

        match loader.resolve(Path::new("ab.xml"), xml).unwrap_err() {
            AppError::UnsupportedSchemaLocation { location } => {
                assert_eq!(location, "https://example.com/c.xsd")
            }
            other => panic!("Expected UnsupportedSchemaLocation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_sources() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.xsd");
        tokio::fs::write(&path, "<xs:schema/>").await.unwrap();

        let loader = SchemaLoader::default();
        let explicit = loader.load(&SchemaSource::Explicit(path)).await.unwrap();
        assert_eq!(explicit, b"<xs:schema/>");

        let bundled = loader.load(&SchemaSource::Bundled).await.unwrap();
        assert!(String::from_utf8(bundled).unwrap().contains("AddressBook"));

        let missing = loader
            .load(&SchemaSource::Referenced(temp_dir.path().join("nope.xsd")))
            .await;
        assert!(matches!(missing, Err(AppError::Io(_))));
    }
}
