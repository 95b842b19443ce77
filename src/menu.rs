//! Interactive console menu
//!
//! Reads commands line by line from any `AsyncBufRead` and writes to any
//! `Write`, so the whole dialogue can be driven from tests.

use std::io::Write;
use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::codec::Format;
use crate::convert::{ConversionRequest, Converter, default_output_name};
use crate::error::{AppError, Result};
use crate::error_reporter::ErrorReporter;
use crate::file_discovery::check_extension;
use crate::output::Output;

/// Menu commands, matched case-insensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    ToJson,
    ToXml,
    Validate,
    Quit,
}

impl MenuCommand {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "J" => Some(MenuCommand::ToJson),
            "X" => Some(MenuCommand::ToXml),
            "V" => Some(MenuCommand::Validate),
            "Q" => Some(MenuCommand::Quit),
            _ => None,
        }
    }
}

/// Answer to a file-name prompt
enum Answer<T> {
    Value(T),
    /// `M` was entered
    BackToMenu,
    /// Input ended
    Eof,
}

pub struct Menu<'a, R, W> {
    input: R,
    output: W,
    converter: &'a Converter,
    console: Output,
    reporter: ErrorReporter,
}

impl<'a, R: AsyncBufRead + Unpin, W: Write> Menu<'a, R, W> {
    pub fn new(input: R, output: W, converter: &'a Converter, console: Output) -> Self {
        let reporter = ErrorReporter::new(console.verbosity());
        Self {
            input,
            output,
            converter,
            console,
            reporter,
        }
    }

    /// Format errors with `reporter` instead of the console's default
    pub fn with_reporter(mut self, reporter: ErrorReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Run until `Q` or end of input
    pub async fn run(&mut self) -> Result<()> {
        loop {
            write!(self.output, "{}", self.console.format_menu())?;
            self.output.flush()?;

            let Some(line) = self.read_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match MenuCommand::parse(&line) {
                Some(MenuCommand::ToJson) => self.convert(Format::Xml).await?,
                Some(MenuCommand::ToXml) => self.convert(Format::Json).await?,
                Some(MenuCommand::Validate) => self.validate().await?,
                Some(MenuCommand::Quit) => break,
                None => writeln!(self.output, "Command not recognized")?,
            }
        }

        debug!("menu closed");
        Ok(())
    }

    async fn convert(&mut self, from: Format) -> Result<()> {
        let input = match self.choose_input(from, "convert").await? {
            Answer::Value(path) => path,
            Answer::BackToMenu | Answer::Eof => return Ok(()),
        };

        let output_name = match self.choose_output(&input, from.other()).await? {
            Answer::Value(name) => name,
            Answer::BackToMenu | Answer::Eof => return Ok(()),
        };

        let request = ConversionRequest::new(input, from).output_name(output_name);
        match self.converter.convert(&request).await {
            Ok(path) => writeln!(self.output, "{}", self.console.format_saved(&path))?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    async fn validate(&mut self) -> Result<()> {
        let input = match self.choose_input(Format::Xml, "validate").await? {
            Answer::Value(path) => path,
            Answer::BackToMenu | Answer::Eof => return Ok(()),
        };

        match self.converter.validate_file(&input).await {
            Ok(source) => writeln!(
                self.output,
                "{}",
                self.console.format_valid(&input, &source.to_string())
            )?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    /// List input files of `format` and prompt until an existing one is named
    async fn choose_input(&mut self, format: Format, action: &str) -> Result<Answer<PathBuf>> {
        let converter = self.converter;
        let discovery = converter.discovery();
        let files = match discovery.require_files(format).await {
            Ok(files) => files,
            Err(e) => {
                self.report(&e)?;
                return Ok(Answer::BackToMenu);
            }
        };

        let example = format!("ab.{}", format.extension());
        writeln!(
            self.output,
            "Please type the name of the file to {} (e.g., \"{}\")",
            action, example
        )?;
        write!(self.output, "{}", self.console.format_file_list(&files))?;

        loop {
            self.output.flush()?;
            let Some(line) = self.read_line().await? else {
                return Ok(Answer::Eof);
            };
            let name = line.trim();
            if name.eq_ignore_ascii_case("m") {
                return Ok(Answer::BackToMenu);
            }

            match discovery.resolve_input(name, format).await {
                Ok(path) => return Ok(Answer::Value(path)),
                Err(e @ (AppError::InvalidFileExtension { .. } | AppError::InputNotFound { .. })) => {
                    self.report(&e)?;
                    writeln!(
                        self.output,
                        "Enter \"M\" to return to the main menu or type the name of the file to {} (e.g., \"{}\")",
                        action, example
                    )?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Prompt for an output name; an empty answer takes the default
    async fn choose_output(&mut self, input: &std::path::Path, to: Format) -> Result<Answer<String>> {
        let default = default_output_name(input, to);
        writeln!(
            self.output,
            "Please type the name of the file to output to (default \"{}\")",
            default
        )?;

        loop {
            self.output.flush()?;
            let Some(line) = self.read_line().await? else {
                return Ok(Answer::Eof);
            };
            let name = line.trim();
            if name.is_empty() {
                return Ok(Answer::Value(default));
            }
            if name.eq_ignore_ascii_case("m") {
                return Ok(Answer::BackToMenu);
            }

            match check_extension(name, to) {
                Ok(()) => return Ok(Answer::Value(name.to_string())),
                Err(e) => {
                    self.report(&e)?;
                    writeln!(
                        self.output,
                        "Enter \"M\" to return to the main menu or type the name of the file to output to (e.g., \"contacts.{}\")",
                        to.extension()
                    )?;
                }
            }
        }
    }

    fn report(&mut self, error: &AppError) -> Result<()> {
        let message = self.reporter.format(error);
        writeln!(self.output, "{}", self.console.format_error(&message))?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}
