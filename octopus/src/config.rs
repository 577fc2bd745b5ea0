use std::num::NonZeroUsize;

pub const DEFAULT_INDENT_SIZE: usize = 4;

/// Settings shared by the scanner and the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of spaces that make up one indentation level.
    pub indent_size: NonZeroUsize,
}

impl Config {
    pub fn with_indent_size(indent_size: NonZeroUsize) -> Self {
        Self { indent_size }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_size: NonZeroUsize::new(DEFAULT_INDENT_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}
