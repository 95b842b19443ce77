//! Console formatting
//!
//! Everything the user reads goes through [`Output`]; tracing is reserved for
//! diagnostics on stderr.

use std::path::{Path, PathBuf};

use crate::cli::VerbosityLevel;
use crate::codec::Format;

const RED: &str = "31";
const GREEN: &str = "32";
const CYAN: &str = "36";

/// Human-readable formatter for console messages
#[derive(Debug, Clone)]
pub struct Output {
    verbosity: VerbosityLevel,
    show_colors: bool,
}

impl Output {
    /// Colors are used only when enabled and stdout is a terminal
    pub fn new(verbosity: VerbosityLevel, color: bool) -> Self {
        Self {
            verbosity,
            show_colors: color && atty::is(atty::Stream::Stdout),
        }
    }

    /// Formatter that never emits escape codes
    pub fn plain(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_colors: false,
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity == VerbosityLevel::Quiet
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    pub fn format_error(&self, message: &str) -> String {
        self.colorize(&format!("[ERROR] {}", message), RED)
    }

    pub fn format_saved(&self, path: &Path) -> String {
        self.colorize(&format!("Successfully saved to {}", path.display()), GREEN)
    }

    pub fn format_valid(&self, path: &Path, schema: &str) -> String {
        format!(
            "{} {} conforms to {}",
            self.colorize("VALID", GREEN),
            path.display(),
            schema
        )
    }

    pub fn format_file_list(&self, files: &[PathBuf]) -> String {
        let mut output = format!(
            "Found {} file(s) with the specified filetype in the input directory:\n",
            files.len()
        );
        for file in files {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());
            output.push_str(&format!("> {}\n", name));
        }
        output
    }

    /// File listing grouped by format, used by the `list` command
    pub fn format_listing(&self, format: Format, dir: &Path, files: &[PathBuf]) -> String {
        let mut output = format!(
            "{} {} file(s) in {}\n",
            self.colorize(&format.to_string(), CYAN),
            files.len(),
            dir.display()
        );
        for file in files {
            output.push_str(&format!("  {}\n", file.display()));
        }
        output
    }

    pub fn format_menu(&self) -> String {
        let rule = "=".repeat(29);
        let mut output = String::new();
        output.push_str(&format!("{}\n", rule));
        output.push_str("[J]: Convert to JSON\n");
        output.push_str("[X]: Convert to XML\n");
        output.push_str("[V]: Validate against schema\n");
        output.push_str("[Q]: Quit\n");
        output.push_str(&format!("{}\n\n", rule));
        output
    }
}
