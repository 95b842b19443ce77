//! CLI entry point for the address-book converter.

use std::io;

use anyhow::Context;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use addressbook_convert::cli::{Cli, Command};
use addressbook_convert::codec::Format;
use addressbook_convert::config::{Config, ConfigManager};
use addressbook_convert::convert::{ConversionRequest, Converter};
use addressbook_convert::error::Result;
use addressbook_convert::error_reporter::ErrorReporter;
use addressbook_convert::menu::Menu;
use addressbook_convert::output::Output;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let config = ConfigManager::load_config(&cli)
        .await
        .context("failed to load configuration")?;

    init_tracing(&config);

    let console = Output::new(config.verbosity(), config.output.color);
    let reporter = ErrorReporter::with_options(console.verbosity(), config.output.timestamps);

    if let Err(e) = run(&cli, config, &console, &reporter).await {
        eprintln!("{}", console.format_error(&reporter.format(&e)));
        std::process::exit(1);
    }

    Ok(())
}

/// WARN by default, DEBUG in verbose mode, TRACE in debug mode; RUST_LOG wins when set
fn init_tracing(config: &Config) {
    let default_level = if config.output.debug {
        "trace"
    } else if config.output.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(
    cli: &Cli,
    config: Config,
    console: &Output,
    reporter: &ErrorReporter,
) -> Result<()> {
    let converter = Converter::new(config);

    match cli.command() {
        Command::ToJson { input, output } => {
            convert(&converter, console, &input, Format::Xml, output, false).await
        }
        Command::ToXml {
            input,
            output,
            validate,
        } => convert(&converter, console, &input, Format::Json, output, validate).await,
        Command::Validate { input } => {
            let path = converter.discovery().resolve_input(&input, Format::Xml).await?;
            let source = converter.validate_file(&path).await?;
            if !console.is_quiet() {
                println!("{}", console.format_valid(&path, &source.to_string()));
            }
            Ok(())
        }
        Command::List { format } => {
            let formats = match format {
                Some(format) => vec![format],
                None => vec![Format::Xml, Format::Json],
            };
            let discovery = converter.discovery();
            for format in formats {
                let files = discovery.discover_files(format).await?;
                print!(
                    "{}",
                    console.format_listing(format, discovery.input_dir(), &files)
                );
            }
            Ok(())
        }
        Command::Menu => {
            let stdin = BufReader::new(tokio::io::stdin());
            let mut menu = Menu::new(stdin, io::stdout(), &converter, console.clone())
                .with_reporter(reporter.clone());
            menu.run().await
        }
    }
}

async fn convert(
    converter: &Converter,
    console: &Output,
    input: &str,
    from: Format,
    output: Option<String>,
    validate: bool,
) -> Result<()> {
    let path = converter.discovery().resolve_input(input, from).await?;

    let mut request = ConversionRequest::new(path, from).validate(validate);
    if let Some(name) = output {
        request = request.output_name(name);
    }

    let written = converter.convert(&request).await?;
    if !console.is_quiet() {
        println!("{}", console.format_saved(&written));
    }
    Ok(())
}
