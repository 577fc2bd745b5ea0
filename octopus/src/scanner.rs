use std::io::Read;

use thiserror::Error;
use tracing::trace;

use crate::{config::Config, source::CharSource, token::Token, token_type::TokenClass};

static KEYWORDS: phf::Map<&'static str, TokenClass> = phf::phf_map! {
    "class" =>   TokenClass::ClassDef,
    "file" =>    TokenClass::ResourceStmt,
    "package" => TokenClass::ResourceStmt,
    "service" => TokenClass::ResourceStmt,
    "if" =>      TokenClass::If,
    "else" =>    TokenClass::Else,
    "elif" =>    TokenClass::Elif,
    "switch" =>  TokenClass::Switch,
    "case" =>    TokenClass::Case,
    "for" =>     TokenClass::For,
    "in" =>      TokenClass::In,
    "and" =>     TokenClass::And,
    "or" =>      TokenClass::Or,
    "true" =>    TokenClass::Bool,
    "false" =>   TokenClass::Bool,
};

/// Pull-based tokenizer.
///
/// Every token produced is kept in `history`; `cursor` points at the token the
/// parser is looking at. Advancing while the cursor is behind the tip replays
/// history instead of lexing, which is what makes `rewind` cheap.
pub struct Scanner<R> {
    source: CharSource<R>,
    history: Vec<Token>,
    cursor: usize,
    line: usize,
    column: usize,
    indent: usize,
    indent_size: usize,
}

impl<R: Read> Scanner<R> {
    pub fn new(source: CharSource<R>, config: &Config) -> Self {
        Self {
            source,
            history: Vec::new(),
            cursor: 0,
            line: 1,
            column: 0,
            indent: 0,
            indent_size: config.indent_size.get(),
        }
    }

    /// Tokenizes the whole input, returning every token up to and including
    /// the end-of-file token.
    pub fn scan_tokens(mut self) -> Result<Vec<Token>> {
        loop {
            if self.advance()?.class == TokenClass::Eof {
                break;
            }
        }
        Ok(self.history)
    }

    /// Moves the cursor to the next token, lexing a new one only when the
    /// cursor is at the tip of the history.
    pub fn advance(&mut self) -> Result<&Token> {
        if self.cursor + 1 < self.history.len() {
            self.cursor += 1;
            trace!(position = self.cursor, "replaying token");
        } else {
            let token = self.scan_token()?;
            trace!(
                class = token.class.name(),
                value = %token.value.escape_debug(),
                line = token.line,
                column = token.column,
                indent = token.indent,
                "scanned token"
            );
            self.history.push(token);
            self.cursor = self.history.len() - 1;
        }
        Ok(&self.history[self.cursor])
    }

    /// Moves the cursor one token back without discarding history.
    pub fn rewind(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            trace!(position = self.cursor, "rewound token cursor");
        }
    }

    /// The token under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if `advance` has not been called yet; [`Parser::new`] primes
    /// the scanner before handing tokens out.
    ///
    /// [`Parser::new`]: crate::parser::Parser::new
    pub fn current(&self) -> &Token {
        &self.history[self.cursor]
    }

    pub fn previous(&self) -> Option<&Token> {
        self.cursor.checked_sub(1).map(|index| &self.history[index])
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn tokens(&self) -> &[Token] {
        &self.history
    }

    /// Indentation level of the most recently lexed line.
    pub fn indent_level(&self) -> usize {
        self.indent
    }

    fn scan_token(&mut self) -> Result<Token> {
        let at_line_start = self
            .history
            .last()
            .map_or(true, |token| token.class == TokenClass::Newline);

        let mut ch = self.bump()?;
        if at_line_start {
            ch = self.measure_indent(ch)?;
        }
        while ch == Some(b' ') {
            ch = self.bump()?;
        }

        let (line, column) = (self.line, self.column);
        let Some(ch) = ch else {
            return Ok(self.make_token(TokenClass::Eof, String::new(), line, column + 1));
        };

        let token = match ch {
            b'0'..=b'9' => {
                let value = self.capture(ch, |c| c.is_ascii_digit())?;
                self.make_token(TokenClass::Int, value, line, column)
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let text = self.capture(ch, |c| c.is_ascii_alphanumeric() || c == b'_')?;
                let class = KEYWORDS
                    .get(text.as_str())
                    .copied()
                    .unwrap_or(TokenClass::Identifier);
                self.make_token(class, text, line, column)
            }
            b'"' | b'\'' => {
                let value = self.string(ch, line, column)?;
                self.make_token(TokenClass::String, value, line, column)
            }
            b'\n' => self.newline("\n", line, column),
            b'\r' => {
                let text = if self.matches(b'\n')? { "\r\n" } else { "\r" };
                self.newline(text, line, column)
            }
            b'!' => {
                if self.matches(b'=')? {
                    self.make_token(TokenClass::NotEqual, "!=".into(), line, column)
                } else {
                    self.make_token(TokenClass::Undefined, "!".into(), line, column)
                }
            }
            b'>' => {
                if self.matches(b'=')? {
                    self.make_token(TokenClass::Gte, ">=".into(), line, column)
                } else {
                    self.make_token(TokenClass::Gt, ">".into(), line, column)
                }
            }
            b'<' => {
                if self.matches(b'=')? {
                    self.make_token(TokenClass::Lte, "<=".into(), line, column)
                } else {
                    self.make_token(TokenClass::Lt, "<".into(), line, column)
                }
            }
            _ => {
                let class = match ch {
                    b':' => TokenClass::Colon,
                    b'=' => TokenClass::Equal,
                    b'+' => TokenClass::Plus,
                    b'-' => TokenClass::Minus,
                    b',' => TokenClass::Comma,
                    b'.' => TokenClass::Point,
                    b'(' => TokenClass::LeftParen,
                    b')' => TokenClass::RightParen,
                    b'#' => TokenClass::Hash,
                    b'[' => TokenClass::LeftBracket,
                    b']' => TokenClass::RightBracket,
                    b'{' => TokenClass::LeftBrace,
                    b'}' => TokenClass::RightBrace,
                    _ => TokenClass::Undefined,
                };
                let text = String::from_utf8_lossy(&[ch]).into_owned();
                self.make_token(class, text, line, column)
            }
        };
        Ok(token)
    }

    /// Counts the leading spaces of a line and updates the indentation level.
    fn measure_indent(&mut self, mut ch: Option<u8>) -> Result<Option<u8>> {
        let mut spaces = 0;
        loop {
            match ch {
                Some(b' ') => {
                    spaces += 1;
                    ch = self.bump()?;
                }
                Some(b'\t') => {
                    return Err(ScanError::TabIndentation {
                        line: self.line,
                        column: self.column,
                    })
                }
                _ => break,
            }
        }

        if spaces % self.indent_size != 0 {
            return Err(ScanError::Indentation {
                line: self.line,
                spaces,
                indent_size: self.indent_size,
            });
        }

        let level = spaces / self.indent_size;
        if level != self.indent {
            trace!(line = self.line, from = self.indent, to = level, "indentation changed");
        }
        self.indent = level;
        Ok(ch)
    }

    /// Collects a run of bytes accepted by `accept`, giving back the first
    /// byte that does not belong to it.
    fn capture(&mut self, first: u8, accept: impl Fn(u8) -> bool) -> Result<String> {
        let mut text = vec![first];
        loop {
            match self.bump()? {
                Some(c) if accept(c) => text.push(c),
                Some(_) => {
                    self.unbump();
                    break;
                }
                None => break,
            }
        }
        Ok(String::from_utf8_lossy(&text).into_owned())
    }

    fn string(&mut self, quote: u8, line: usize, column: usize) -> Result<String> {
        let mut text = Vec::new();
        loop {
            match self.bump()? {
                Some(c) if c == quote => break,
                Some(b'\n') | Some(b'\r') | None => {
                    return Err(ScanError::UnterminatedString { line, column })
                }
                Some(c) => text.push(c),
            }
        }
        Ok(String::from_utf8_lossy(&text).into_owned())
    }

    fn newline(&mut self, text: &str, line: usize, column: usize) -> Token {
        let token = self.make_token(TokenClass::Newline, text.into(), line, column);
        self.line += 1;
        self.column = 0;
        token
    }

    fn matches(&mut self, expected: u8) -> Result<bool> {
        match self.bump()? {
            Some(c) if c == expected => Ok(true),
            Some(_) => {
                self.unbump();
                Ok(false)
            }
            None => Ok(false),
        }
    }

    fn bump(&mut self) -> Result<Option<u8>> {
        let ch = self.source.advance()?;
        if ch.is_some() {
            self.column += 1;
        }
        Ok(ch)
    }

    fn unbump(&mut self) {
        if self.source.retreat() {
            self.column -= 1;
        }
    }

    #[inline]
    fn make_token(&self, class: TokenClass, value: String, line: usize, column: usize) -> Token {
        Token::new(class, value, line, column, self.indent)
    }
}

type Result<T> = std::result::Result<T, ScanError>;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
    #[error("indentation of {spaces} spaces at line {line} is not a multiple of {indent_size}")]
    Indentation {
        line: usize,
        spaces: usize,
        indent_size: usize,
    },
    #[error("tab used for indentation at line {line}, column {column}")]
    TabIndentation { line: usize, column: usize },
    #[error("unterminated string starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use pretty_assertions::assert_eq;

    use super::*;

    fn scanner(source: &str) -> Scanner<&[u8]> {
        Scanner::new(CharSource::new(source.as_bytes()), &Config::default())
    }

    fn scan(source: &str) -> Vec<Token> {
        scanner(source).scan_tokens().unwrap()
    }

    fn classes(source: &str) -> Vec<TokenClass> {
        scan(source).into_iter().map(|token| token.class).collect()
    }

    fn values(source: &str) -> Vec<String> {
        scan(source).into_iter().map(|token| token.value).collect()
    }

    #[test]
    fn class_header() {
        use TokenClass::*;
        assert_eq!(
            classes("class Foo:\n"),
            vec![ClassDef, Identifier, Colon, Newline, Eof]
        );
        assert_eq!(values("class Foo:\n"), vec!["class", "Foo", ":", "\n", ""]);
    }

    #[test]
    fn whitespace_only_input_yields_newlines() {
        let mut scanner = scanner("\n\n    \n        ");
        let mut seen = Vec::new();
        loop {
            let class = scanner.advance().unwrap().class;
            seen.push(class);
            if class == TokenClass::Eof {
                break;
            }
        }
        use TokenClass::*;
        assert_eq!(seen, vec![Newline, Newline, Newline, Eof]);
        assert_eq!(scanner.indent_level(), 2);
    }

    #[test]
    fn plain_identifiers_keep_their_text() {
        let tokens = scan("path _owner mode2 file_name Class");
        let expected = ["path", "_owner", "mode2", "file_name", "Class"];
        for (token, text) in tokens.iter().zip(expected) {
            assert_eq!(token.class, TokenClass::Identifier);
            assert_eq!(token.value, text);
            assert_eq!(token.length, text.len());
        }
        assert_eq!(tokens.len(), expected.len() + 1);
    }

    #[test]
    fn reserved_words() {
        use TokenClass::*;
        assert_eq!(
            classes("class file package service if else elif switch case for in and or true false"),
            vec![
                ClassDef,
                ResourceStmt,
                ResourceStmt,
                ResourceStmt,
                If,
                Else,
                Elif,
                Switch,
                Case,
                For,
                In,
                And,
                Or,
                Bool,
                Bool,
                Eof
            ]
        );
    }

    #[test]
    fn integers_give_back_the_overrun_byte() {
        use TokenClass::*;
        assert_eq!(classes("123+4"), vec![Int, Plus, Int, Eof]);
        assert_eq!(values("123+4"), vec!["123", "+", "4", ""]);
        assert_eq!(values("42"), vec!["42", ""]);
    }

    #[test]
    fn strings_in_either_quote() {
        let tokens = scan(r#""/etc/hosts" 'it"s'"#);
        assert_eq!(tokens[0].class, TokenClass::String);
        assert_eq!(tokens[0].value, "/etc/hosts");
        assert_eq!(tokens[0].length, 10);
        assert_eq!(tokens[1].class, TokenClass::String);
        assert_eq!(tokens[1].value, "it\"s");
    }

    #[test]
    fn unterminated_string() {
        let err = scanner("x = \"abc\ny").scan_tokens().unwrap_err();
        assert!(matches!(
            err,
            ScanError::UnterminatedString { line: 1, column: 5 }
        ));
        let err = scanner("'abc").scan_tokens().unwrap_err();
        assert!(matches!(err, ScanError::UnterminatedString { line: 1, column: 1 }));
    }

    #[test]
    fn operators_and_punctuation() {
        use TokenClass::*;
        assert_eq!(
            classes("!= >= > <= < = - + , . : # ( ) [ ] { }"),
            vec![
                NotEqual, Gte, Gt, Lte, Lt, Equal, Minus, Plus, Comma, Point, Colon, Hash,
                LeftParen, RightParen, LeftBracket, RightBracket, LeftBrace, RightBrace, Eof
            ]
        );
        assert_eq!(values("a>=b"), vec!["a", ">=", "b", ""]);
        assert_eq!(values("a<b"), vec!["a", "<", "b", ""]);
    }

    #[test]
    fn double_equal_is_two_equal_tokens() {
        use TokenClass::*;
        assert_eq!(classes("1 == 2"), vec![Int, Equal, Equal, Int, Eof]);
    }

    #[test]
    fn unknown_bytes_become_undefined_tokens() {
        let tokens = scan("a @ ! b\t");
        assert_eq!(tokens[1].class, TokenClass::Undefined);
        assert_eq!(tokens[1].value, "@");
        assert_eq!(tokens[2].class, TokenClass::Undefined);
        assert_eq!(tokens[2].value, "!");
        assert_eq!(tokens[3].class, TokenClass::Identifier);
        assert_eq!(tokens[4].class, TokenClass::Undefined);
        assert_eq!(tokens[4].value, "\t");
    }

    #[test]
    fn crlf_is_a_single_newline() {
        let tokens = scan("a\r\nb\rc\n");
        use TokenClass::*;
        let classes: Vec<_> = tokens.iter().map(|token| token.class).collect();
        assert_eq!(
            classes,
            vec![Identifier, Newline, Identifier, Newline, Identifier, Newline, Eof]
        );
        assert_eq!(tokens[1].value, "\r\n");
        assert_eq!(tokens[2].line, 2);
        assert_eq!(tokens[4].line, 3);
        assert_eq!(tokens[6].line, 4);
    }

    #[test]
    fn tokens_carry_line_column_and_indent() {
        let tokens = scan("class Foo:\n    path = \"/etc/a\"\n");
        let positions: Vec<_> = tokens
            .iter()
            .map(|token| (token.line, token.column, token.indent))
            .collect();
        assert_eq!(
            positions,
            vec![
                (1, 1, 0),
                (1, 7, 0),
                (1, 10, 0),
                (1, 11, 0),
                (2, 5, 1),
                (2, 10, 1),
                (2, 12, 1),
                (2, 20, 1),
                (3, 1, 0),
            ]
        );
    }

    #[test]
    fn indentation_must_be_a_multiple_of_the_indent_size() {
        let err = scanner("class Foo:\n  file \"a\":\n").scan_tokens().unwrap_err();
        assert!(matches!(
            err,
            ScanError::Indentation {
                line: 2,
                spaces: 2,
                indent_size: 4
            }
        ));
    }

    #[test]
    fn configured_indent_size() {
        let config = Config::with_indent_size(NonZeroUsize::new(2).unwrap());
        let source = "class Foo:\n  file \"a\":\n    path = 1\n";
        let tokens = Scanner::new(CharSource::new(source.as_bytes()), &config)
            .scan_tokens()
            .unwrap();
        assert_eq!(tokens[4].class, TokenClass::ResourceStmt);
        assert_eq!(tokens[4].indent, 1);
        assert_eq!(tokens[8].class, TokenClass::Identifier);
        assert_eq!(tokens[8].indent, 2);
    }

    #[test]
    fn tabs_are_rejected_in_indentation() {
        let err = scanner("class Foo:\n\tpath = 1\n").scan_tokens().unwrap_err();
        assert!(matches!(err, ScanError::TabIndentation { line: 2, column: 1 }));
    }

    #[test]
    fn leading_indentation_on_the_first_line_is_measured() {
        let tokens = scan("    x");
        assert_eq!(tokens[0].indent, 1);
        assert_eq!(tokens[0].column, 5);
    }

    #[test]
    fn rewind_replays_without_lexing() {
        let mut scanner = scanner("a = 1\n");
        scanner.advance().unwrap();
        scanner.advance().unwrap();
        assert_eq!(scanner.current().class, TokenClass::Equal);
        assert_eq!(scanner.tokens().len(), 2);

        scanner.rewind();
        assert_eq!(scanner.position(), 0);
        assert_eq!(scanner.current().value, "a");
        assert_eq!(scanner.tokens().len(), 2);

        assert_eq!(scanner.advance().unwrap().class, TokenClass::Equal);
        assert_eq!(scanner.tokens().len(), 2);
        assert_eq!(scanner.previous().map(|token| token.value.as_str()), Some("a"));

        assert_eq!(scanner.advance().unwrap().class, TokenClass::Int);
        assert_eq!(scanner.tokens().len(), 3);
    }

    #[test]
    fn rewind_never_moves_before_the_first_token() {
        let mut scanner = scanner("a");
        scanner.advance().unwrap();
        scanner.rewind();
        scanner.rewind();
        assert_eq!(scanner.position(), 0);
        assert_eq!(scanner.current().value, "a");
    }

    #[test]
    fn lexing_is_deterministic() {
        let source = "class Web:\n    service 'nginx':\n        enabled = true\n";
        assert_eq!(scan(source), scan(source));
    }

    #[test]
    fn tiny_chunks_lex_like_large_ones() {
        let source = "class Web:\n    package \"nginx\":\n        version >= 12\n";
        let tokens = Scanner::new(
            CharSource::with_chunk_size(source.as_bytes(), 1),
            &Config::default(),
        )
        .scan_tokens()
        .unwrap();
        assert_eq!(tokens, scan(source));
    }

    #[test]
    fn end_of_file_repeats() {
        let mut scanner = scanner("");
        assert_eq!(scanner.advance().unwrap().class, TokenClass::Eof);
        assert_eq!(scanner.advance().unwrap().class, TokenClass::Eof);
    }

    #[test]
    #[should_panic]
    fn current_requires_an_advance() {
        let scanner = scanner("a");
        let _ = scanner.current();
    }
}
