use crate::cli::VerbosityLevel;
use crate::config::ConfigError;
use crate::error::{AppError, CodecError, ValidationError};

/// Error reporter with configurable verbosity
#[derive(Debug, Clone)]
pub struct ErrorReporter {
    verbosity: VerbosityLevel,
    show_timestamps: bool,
}

impl ErrorReporter {
    /// Create a new error reporter with specified verbosity
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_timestamps: false,
        }
    }

    /// Create a new error reporter with additional options
    pub fn with_options(verbosity: VerbosityLevel, show_timestamps: bool) -> Self {
        Self {
            verbosity,
            show_timestamps,
        }
    }

    /// Format an error for the configured verbosity
    ///
    /// The result is the message body; the caller adds the `[ERROR]` marker.
    pub fn format(&self, error: &AppError) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet => self.format_error_brief(error),
            VerbosityLevel::Normal => self.format_error_normal(error),
            VerbosityLevel::Verbose => self.format_error_verbose(error),
            VerbosityLevel::Debug => self.format_error_debug(error),
        }
    }

    /// Format error for brief output (quiet mode)
    fn format_error_brief(&self, error: &AppError) -> String {
        match error {
            AppError::Validation(ValidationError::Invalid { errors }) => {
                format!("INVALID: {} schema violation(s)", errors.len())
            }
            AppError::InputNotFound { name, .. } => format!("NOT FOUND: {}", name),
            _ => error.to_string(),
        }
    }

    /// Format error for normal output
    fn format_error_normal(&self, error: &AppError) -> String {
        let timestamp = if self.show_timestamps {
            format!("[{}] ", chrono::Utc::now().format("%H:%M:%S"))
        } else {
            String::new()
        };

        format!("{}{}", timestamp, error)
    }

    /// Format error for verbose output
    fn format_error_verbose(&self, error: &AppError) -> String {
        let mut output = match error {
            // One diagnostic per line reads better than the joined message
            AppError::Validation(ValidationError::Invalid { errors }) => {
                let mut text = self.format_error_normal(error);
                if let Some(cut) = text.find(": ") {
                    text.truncate(cut);
                }
                for diagnostic in errors {
                    text.push_str(&format!("\n  {}", diagnostic));
                }
                text
            }
            _ => self.format_error_normal(error),
        };

        if let Some(hint) = self.hint(error) {
            output.push_str(&format!("\nSuggestion: {}", hint));
        }

        output
    }

    /// Format error for debug output
    fn format_error_debug(&self, error: &AppError) -> String {
        let mut output = self.format_error_verbose(error);
        output.push_str(&format!("\nDebug Info: {:?}", error));

        output.push_str("\nError Chain:");
        let mut current_error: &dyn std::error::Error = error;
        let mut level = 0;
        while let Some(source) = current_error.source() {
            output.push_str(&format!("\n  {}: {}", level + 1, source));
            current_error = source;
            level += 1;
        }

        output
    }

    /// Helpful suggestion for an error, if one applies
    fn hint(&self, error: &AppError) -> Option<String> {
        match error {
            AppError::InvalidFileExtension { expected, .. } => {
                Some(format!("Give a file name ending in {}", expected))
            }
            AppError::InputNotFound { dir, .. } => Some(format!(
                "Check the name, or point --input-dir somewhere other than {}",
                dir.display()
            )),
            AppError::NoInputFiles { dir, .. } => Some(format!(
                "Place input files in {} or pass --input-dir",
                dir.display()
            )),
            AppError::UnsupportedSchemaLocation { .. } => {
                Some("Download the schema and pass it with --schema".to_string())
            }
            AppError::Codec(CodecError::FieldMissing { .. }) => {
                Some("Every contact needs all required fields, even if empty".to_string())
            }
            AppError::Codec(CodecError::DocumentParse { .. }) => {
                Some("Check the document syntax".to_string())
            }
            AppError::Validation(ValidationError::SchemaParse { .. }) => {
                Some("Check the schema file, or omit --schema to use the bundled one".to_string())
            }
            AppError::Config(config_error) => Some(self.get_config_help(config_error)),
            _ => None,
        }
    }

    /// Get helpful suggestions for configuration errors
    fn get_config_help(&self, error: &ConfigError) -> String {
        match error {
            ConfigError::Io(_) => "Check that the configuration file exists and is readable".to_string(),
            ConfigError::TomlParsing(_) | ConfigError::JsonParsing(_) => {
                "Check the configuration file syntax (TOML/JSON format expected)".to_string()
            }
            ConfigError::Validation(_) => {
                "Resolve conflicting values between file, environment, and CLI".to_string()
            }
            ConfigError::Environment(_) => {
                "Fix or unset the ADDRESSBOOK_* environment variable".to_string()
            }
            ConfigError::UnsupportedFormat(_) => {
                "Use a .toml or .json configuration file".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn not_found() -> AppError {
        AppError::InputNotFound {
            name: "ab.xml".to_string(),
            dir: PathBuf::from("input"),
        }
    }

    #[test]
    fn test_normal_is_display() {
        let reporter = ErrorReporter::new(VerbosityLevel::Normal);
        assert_eq!(
            reporter.format(&not_found()),
            "Unable to find \"ab.xml\" in \"input\""
        );
    }

    #[test]
    fn test_brief_output() {
        let reporter = ErrorReporter::new(VerbosityLevel::Quiet);
        assert_eq!(reporter.format(&not_found()), "NOT FOUND: ab.xml");

        let invalid = AppError::Validation(ValidationError::Invalid {
            errors: vec!["a".to_string(), "b".to_string()],
        });
        assert_eq!(reporter.format(&invalid), "INVALID: 2 schema violation(s)");
    }

    #[test]
    fn test_verbose_adds_hint() {
        let reporter = ErrorReporter::new(VerbosityLevel::Verbose);
        let error = AppError::InvalidFileExtension {
            expected: ".json".to_string(),
            actual: ".txt".to_string(),
        };
        let text = reporter.format(&error);
        assert!(text.starts_with("Invalid file extension"));
        assert!(text.contains("Suggestion: Give a file name ending in .json"));
    }

    #[test]
    fn test_verbose_lists_diagnostics() {
        let reporter = ErrorReporter::new(VerbosityLevel::Verbose);
        let error = AppError::Validation(ValidationError::Invalid {
            errors: vec![
                "line 4: Element 'Notes': This element is not expected.".to_string(),
                "line 9: Missing child element(s).".to_string(),
            ],
        });

        let text = reporter.format(&error);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Document does not conform to the schema");
        assert!(lines[1].contains("Notes"));
        assert!(lines[2].contains("line 9"));
    }

    #[test]
    fn test_debug_includes_debug_repr() {
        let reporter = ErrorReporter::new(VerbosityLevel::Debug);
        let text = reporter.format(&not_found());
        assert!(text.contains("Debug Info: InputNotFound"));
        assert!(text.contains("Error Chain:"));
    }

    #[test]
    fn test_timestamps() {
        let reporter = ErrorReporter::with_options(VerbosityLevel::Normal, true);
        let text = reporter.format(&not_found());
        assert!(text.starts_with('['));
        assert_eq!(&text[9..11], "] ");
    }

    #[test]
    fn test_config_hint() {
        let reporter = ErrorReporter::new(VerbosityLevel::Verbose);
        let error = AppError::Config(ConfigError::UnsupportedFormat("yaml".to_string()));
        assert!(reporter.format(&error).contains("Use a .toml or .json"));
    }
}
