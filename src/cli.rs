use clap::{ArgAction, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::codec::Format;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show critical errors
    Quiet,
    /// Show standard information
    #[default]
    Normal,
    /// Show detailed information
    Verbose,
    /// Show all available debugging information
    Debug,
}

/// Convert address books between JSON and XML
#[derive(Parser, Debug, Clone)]
#[command(name = "addressbook-convert")]
#[command(about = "Convert contact address books between JSON and XML, with XSD validation")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Directory input files are looked up in
    #[arg(long = "input-dir", global = true)]
    pub input_dir: Option<PathBuf>,

    /// Directory converted files are written to
    #[arg(long = "output-dir", global = true)]
    pub output_dir: Option<PathBuf>,

    /// Schema used for validation, overriding any document reference
    #[arg(long = "schema", global = true)]
    pub schema: Option<PathBuf>,

    /// Spaces per indentation level in written documents
    #[arg(long = "indent", global = true)]
    pub indent: Option<usize>,

    /// Trim surrounding whitespace from XML text values
    #[arg(long = "trim-text", global = true)]
    pub trim_text: bool,

    /// Enable verbose output; repeat for debug output
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        action = ArgAction::Count,
        help = "Enable verbose output (-vv for debug output)"
    )]
    pub verbose: u8,

    /// Enable quiet mode (errors only)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Disable ANSI colors
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Prefix error messages with the time they occurred
    #[arg(long = "timestamps", global = true)]
    pub timestamps: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Convert an XML address book to JSON
    ToJson {
        /// XML file, as a path or a name inside the input directory
        input: String,

        /// Output file name (defaults to the input name with a .json extension)
        #[arg(short = 'o', long = "output")]
        output: Option<String>,
    },

    /// Convert a JSON address book to XML
    ToXml {
        /// JSON file, as a path or a name inside the input directory
        input: String,

        /// Output file name (defaults to the input name with a .xml extension)
        #[arg(short = 'o', long = "output")]
        output: Option<String>,

        /// Validate the produced XML before writing it
        #[arg(long = "validate")]
        validate: bool,
    },

    /// Validate an XML address book against its schema
    Validate {
        /// XML file, as a path or a name inside the input directory
        input: String,
    },

    /// List candidate input files
    List {
        /// Only list files of this format
        #[arg(long = "format", value_enum)]
        format: Option<Format>,
    },

    /// Interactive menu
    Menu,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to run; the menu when none was given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_command_is_menu() {
        let cli = Cli::try_parse_from(["addressbook-convert"]).unwrap();
        assert_eq!(cli.command(), Command::Menu);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.timestamps);
    }

    #[test]
    fn test_to_json_parsing() {
        let cli =
            Cli::try_parse_from(["addressbook-convert", "to-json", "book.xml", "-o", "out.json"])
                .unwrap();
        assert_eq!(
            cli.command(),
            Command::ToJson {
                input: "book.xml".to_string(),
                output: Some("out.json".to_string()),
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "addressbook-convert",
            "to-xml",
            "book.json",
            "--validate",
            "--indent",
            "4",
            "--output-dir",
            "/tmp/out",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.indent, Some(4));
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command(), Command::ToXml { validate: true, .. }));
    }

    #[test]
    fn test_list_format() {
        let cli = Cli::try_parse_from(["addressbook-convert", "list", "--format", "json"]).unwrap();
        assert_eq!(
            cli.command(),
            Command::List {
                format: Some(Format::Json)
            }
        );
    }

    #[test]
    fn test_repeated_verbose_and_timestamps() {
        let cli = Cli::try_parse_from(["addressbook-convert", "-vv", "--timestamps", "list"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.timestamps);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["addressbook-convert", "-v", "-q"]);
        assert!(result.is_err());
    }
}
