//! Front end for the octopus configuration language: an indentation-sensitive
//! DSL of classes holding `file`, `package` and `service` resource blocks.
//!
//! Source text flows through [`source::CharSource`] (bytes),
//! [`scanner::Scanner`] (tokens) and [`parser::Parser`] (syntax tree).

use std::{fs::File, path::Path, path::PathBuf};

use thiserror::Error;

pub mod ast_printer;
pub mod catalog;
pub mod config;
pub mod expr;
pub mod literal;
pub mod parser;
pub mod scanner;
pub mod source;
pub mod stmt;
pub mod token;
pub mod token_type;

use config::Config;
use parser::{ParseError, Parser};
use scanner::{ScanError, Scanner};
use source::CharSource;
use stmt::Program;
use token::Token;

/// Parses the file at `path`, stopping at the first error.
pub fn parse_file(path: impl AsRef<Path>, config: &Config) -> Result<Program, Error> {
    let scanner = Scanner::new(open(path.as_ref())?, config);
    Ok(Parser::new(scanner)?.parse()?)
}

pub fn parse_str(source: &str, config: &Config) -> Result<Program, ParseError> {
    let scanner = Scanner::new(CharSource::new(source.as_bytes()), config);
    Parser::new(scanner)?.parse()
}

/// Every token of the file at `path`, ending with the end-of-file token.
pub fn tokenize_file(path: impl AsRef<Path>, config: &Config) -> Result<Vec<Token>, Error> {
    let scanner = Scanner::new(open(path.as_ref())?, config);
    Ok(scanner.scan_tokens()?)
}

fn open(path: &Path) -> Result<CharSource<File>, Error> {
    tracing::debug!(path = %path.display(), "opening source file");
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(CharSource::new(file))
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
