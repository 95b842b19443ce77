use crate::cli::{Cli, VerbosityLevel};
use crate::codec::CodecOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum accepted indentation width
pub const MAX_INDENT: usize = 16;

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub format: FormatConfig,
    pub output: OutputConfig,
}

/// Where files are read from and written to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory input files are looked up in
    pub input_dir: PathBuf,
    /// Directory converted files are written to
    pub output_dir: PathBuf,
    /// Schema overriding document references
    pub schema: Option<PathBuf>,
}

/// Document formatting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormatConfig {
    /// Spaces per indentation level
    pub indent: usize,
    /// Trim whitespace around XML text values
    pub trim_text: bool,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Verbose output
    pub verbose: bool,
    /// Debug output, including error chains; implies verbose
    pub debug: bool,
    /// Quiet mode (errors only)
    pub quiet: bool,
    /// ANSI colors on terminals
    pub color: bool,
    /// Timestamp error messages
    pub timestamps: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            schema: None,
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            trim_text: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            debug: false,
            quiet: false,
            color: true,
            timestamps: false,
        }
    }
}

impl Config {
    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            indent: self.format.indent,
            trim_text: self.format.trim_text,
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.output.quiet {
            VerbosityLevel::Quiet
        } else if self.output.debug {
            VerbosityLevel::Debug
        } else if self.output.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: file -> environment -> CLI
    pub async fn load_config(cli: &Cli) -> Result<Config> {
        Self::load_config_with(&SystemEnvProvider, cli).await
    }

    /// Same as `load_config`, reading the environment through `env`
    pub async fn load_config_with(env: &impl EnvProvider, cli: &Cli) -> Result<Config> {
        let mut config = Config::default();

        if let Some(config_path) = &cli.config {
            let file_config = Self::load_from_file(config_path).await?;
            config = Self::merge_configs(config, file_config);
        } else if let Some(found_config) = Self::find_config_file().await? {
            config = Self::merge_configs(config, found_config);
        }

        config = Self::apply_environment_overrides_with(env, config)?;
        config = Self::merge_with_cli(config, cli);

        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub async fn load_from_file(path: &Path) -> Result<Config> {
        let content = tokio::fs::read_to_string(path).await?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Find configuration file in standard locations
    pub async fn find_config_file() -> Result<Option<Config>> {
        let config_names = [
            "addressbook.toml",
            "addressbook.json",
            ".addressbook.toml",
            ".addressbook.json",
        ];

        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path).await?));
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("addressbook-convert");
            for name in &config_names {
                let path = app_config_dir.join(name);
                if path.exists() {
                    return Ok(Some(Self::load_from_file(&path).await?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        if let Some(dir) = env.get("ADDRESSBOOK_INPUT_DIR") {
            config.paths.input_dir = PathBuf::from(dir);
        }

        if let Some(dir) = env.get("ADDRESSBOOK_OUTPUT_DIR") {
            config.paths.output_dir = PathBuf::from(dir);
        }

        if let Some(schema) = env.get("ADDRESSBOOK_SCHEMA") {
            config.paths.schema = Some(PathBuf::from(schema));
        }

        if let Some(indent) = env.get("ADDRESSBOOK_INDENT") {
            config.format.indent = parse_env("ADDRESSBOOK_INDENT", &indent)?;
        }

        if let Some(trim) = env.get("ADDRESSBOOK_TRIM_TEXT") {
            config.format.trim_text = parse_env("ADDRESSBOOK_TRIM_TEXT", &trim)?;
        }

        if let Some(verbose) = env.get("ADDRESSBOOK_VERBOSE") {
            config.output.verbose = parse_env("ADDRESSBOOK_VERBOSE", &verbose)?;
        }

        if let Some(debug) = env.get("ADDRESSBOOK_DEBUG") {
            config.output.debug = parse_env("ADDRESSBOOK_DEBUG", &debug)?;
        }

        if let Some(quiet) = env.get("ADDRESSBOOK_QUIET") {
            config.output.quiet = parse_env("ADDRESSBOOK_QUIET", &quiet)?;
        }

        if let Some(color) = env.get("ADDRESSBOOK_COLOR") {
            config.output.color = parse_env("ADDRESSBOOK_COLOR", &color)?;
        }

        if let Some(timestamps) = env.get("ADDRESSBOOK_TIMESTAMPS") {
            config.output.timestamps = parse_env("ADDRESSBOOK_TIMESTAMPS", &timestamps)?;
        }

        Ok(config)
    }

    /// Merge CLI arguments with configuration (CLI takes precedence)
    ///
    /// Flags only override when given; an absent flag keeps the configured value.
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if let Some(dir) = &cli.input_dir {
            config.paths.input_dir = dir.clone();
        }
        if let Some(dir) = &cli.output_dir {
            config.paths.output_dir = dir.clone();
        }
        if let Some(schema) = &cli.schema {
            config.paths.schema = Some(schema.clone());
        }

        if let Some(indent) = cli.indent {
            config.format.indent = indent;
        }
        if cli.trim_text {
            config.format.trim_text = true;
        }

        if cli.verbose > 0 {
            config.output.verbose = true;
            config.output.quiet = false;
        }
        if cli.verbose > 1 {
            config.output.debug = true;
        }
        if cli.quiet {
            config.output.quiet = true;
            config.output.verbose = false;
            config.output.debug = false;
        }
        if cli.no_color {
            config.output.color = false;
        }
        if cli.timestamps {
            config.output.timestamps = true;
        }

        config
    }

    /// Merge two configurations (second takes precedence for non-None values)
    pub fn merge_configs(mut base: Config, override_config: Config) -> Config {
        base.paths.input_dir = override_config.paths.input_dir;
        base.paths.output_dir = override_config.paths.output_dir;
        if override_config.paths.schema.is_some() {
            base.paths.schema = override_config.paths.schema;
        }

        base.format = override_config.format;
        base.output = override_config.output;

        base
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        if config.format.indent > MAX_INDENT {
            return Err(ConfigError::Validation(format!(
                "Indent cannot exceed {} spaces",
                MAX_INDENT
            )));
        }

        if (config.output.verbose || config.output.debug) && config.output.quiet {
            return Err(ConfigError::Validation(
                "Cannot enable both verbose and quiet modes".to_string(),
            ));
        }

        if config.paths.input_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "Input directory must not be empty".to_string(),
            ));
        }

        if config.paths.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "Output directory must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Environment(format!("Invalid {} value: {}", key, value)))
}
