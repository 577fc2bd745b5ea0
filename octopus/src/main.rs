use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use octopus::{
    ast_printer::program_to_string, catalog::Catalog, config::Config, parser::ParseError,
    scanner::ScanError, Error,
};
use tracing::info;

const EXIT_DATA_ERROR: u8 = 65;
const EXIT_NO_INPUT: u8 = 66;

#[derive(Parser)]
#[command(name = "octopus", version, about = "Validate and inspect octopus catalog files")]
struct Cli {
    /// Number of spaces per indentation level
    #[arg(
        long,
        global = true,
        default_value = "4",
        env = "OCTOPUS_INDENT_SIZE"
    )]
    indent_size: std::num::NonZeroUsize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a catalog file and list the resources it declares
    Apply { file: PathBuf },
    /// Check a catalog file for lexical and grammar errors
    Validate {
        file: PathBuf,
        /// Print an outline of the parsed classes
        #[arg(long)]
        print: bool,
        /// Print the token stream instead of parsing
        #[arg(long)]
        tokens: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::with_indent_size(cli.indent_size);

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(command: Command, config: &Config) -> Result<(), Error> {
    match command {
        Command::Apply { file } => {
            let program = octopus::parse_file(&file, config)?;
            let catalog = Catalog::from_program(&program);
            info!(path = %file.display(), resources = catalog.items().len(), "built catalog");
            for item in catalog.items() {
                println!("{item}");
            }
        }
        Command::Validate {
            file,
            tokens: true,
            ..
        } => {
            for token in octopus::tokenize_file(&file, config)? {
                println!("{token}");
            }
        }
        Command::Validate { file, print, .. } => {
            let program = octopus::parse_file(&file, config)?;
            info!(path = %file.display(), classes = program.classes.len(), "validated");
            if print {
                print!("{}", program_to_string(&program));
            }
            println!("OK");
        }
    }
    Ok(())
}

fn exit_code(err: &Error) -> u8 {
    match err {
        Error::Open { .. } | Error::Scan(ScanError::Io(_)) => EXIT_NO_INPUT,
        Error::Parse(ParseError::Scan(ScanError::Io(_))) => EXIT_NO_INPUT,
        Error::Scan(_) | Error::Parse(_) => EXIT_DATA_ERROR,
    }
}

/// Installs a stderr subscriber when `RUST_LOG` is set,
/// e.g. `RUST_LOG=octopus=trace`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}
