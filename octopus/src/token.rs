use crate::token_type::TokenClass;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub class: TokenClass,
    pub value: String,
    pub length: usize,
    pub line: usize,
    pub column: usize,
    /// Indentation level of the line the token starts on.
    pub indent: usize,
}

impl Token {
    pub fn new(class: TokenClass, value: String, line: usize, column: usize, indent: usize) -> Self {
        Token {
            class,
            length: value.len(),
            value,
            line,
            column,
            indent,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{:>4}:{:<3} {:<14} {:?}",
            self.line,
            self.column,
            self.class.name(),
            self.value
        ))
    }
}
