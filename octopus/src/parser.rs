use std::io::Read;

use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    expr::Expr,
    literal::Literal,
    scanner::{ScanError, Scanner},
    stmt::{Branch, ClassDecl, Program, ResourceBlock, Stmt},
    token::Token,
    token_type::TokenClass,
};

/// Recursive-descent parser driving a [`Scanner`] one token at a time.
///
/// Blocks have no terminator: a block at depth `L` keeps consuming statements
/// while the next statement starts at indent `L` and closes as soon as one
/// starts shallower. The first error ends the parse.
pub struct Parser<R> {
    scanner: Scanner<R>,
}

impl<R: Read> Parser<R> {
    pub fn new(mut scanner: Scanner<R>) -> Result<Self> {
        // prime the parser
        scanner.advance()?;
        Ok(Self { scanner })
    }

    pub fn parse(mut self) -> Result<Program> {
        let mut classes = Vec::new();
        loop {
            if self.accept(TokenClass::Newline)? {
                continue;
            }
            if self.check(TokenClass::Eof) {
                break;
            }
            self.check_indent(0)?;
            if !self.check(TokenClass::ClassDef) {
                return Err(self.unexpected(&[TokenClass::ClassDef]));
            }
            classes.push(self.class_declaration(0)?);
        }
        debug!(classes = classes.len(), "parsed program");
        Ok(Program { classes })
    }

    fn class_declaration(&mut self, level: usize) -> Result<ClassDecl> {
        let keyword = self.expect(TokenClass::ClassDef)?;
        let name = self.expect(TokenClass::Identifier)?;
        self.expect(TokenClass::Colon)?;
        self.expect(TokenClass::Newline)?;

        debug!(name = %name.value, line = keyword.line, "parsing class");
        let body = self.block(level + 1)?;

        Ok(ClassDecl {
            name: name.value,
            line: keyword.line,
            body,
        })
    }

    /// Statements at exactly `level`, up to the first line indented less.
    fn block(&mut self, level: usize) -> Result<Vec<Stmt>> {
        let mut statements = Vec::new();
        loop {
            while self.accept(TokenClass::Newline)? {}
            let token = self.current();
            if token.class == TokenClass::Eof || token.indent < level {
                break;
            }
            self.check_indent(level)?;
            statements.push(self.statement(level)?);
        }
        debug!(level, statements = statements.len(), "closed block");
        Ok(statements)
    }

    fn statement(&mut self, level: usize) -> Result<Stmt> {
        match self.current().class {
            TokenClass::ResourceStmt => Ok(Stmt::Resource(self.resource(level)?)),
            TokenClass::If => self.if_statement(level),
            TokenClass::For => self.for_statement(level),
            TokenClass::Switch => self.switch_statement(level),
            _ => self.simple_statement(),
        }
    }

    fn resource(&mut self, level: usize) -> Result<ResourceBlock> {
        let keyword = self.expect(TokenClass::ResourceStmt)?;

        let title = self.current().clone();
        if !self.accept_any([TokenClass::String, TokenClass::Identifier])? {
            return Err(self.unexpected(&[TokenClass::String, TokenClass::Identifier]));
        }
        let title = match title.class {
            TokenClass::String => Expr::Literal(Literal::from(title.value)),
            _ => Expr::Variable(title),
        };

        self.expect(TokenClass::Colon)?;
        self.expect(TokenClass::Newline)?;

        debug!(kind = %keyword.value, line = keyword.line, "parsing resource");
        let body = self.block(level + 1)?;

        Ok(ResourceBlock {
            kind: keyword.value,
            title,
            line: keyword.line,
            body,
        })
    }

    fn if_statement(&mut self, level: usize) -> Result<Stmt> {
        self.expect(TokenClass::If)?;
        let mut branches = vec![self.branch(level + 1)?];

        while self.at_indent(level) && self.accept(TokenClass::Elif)? {
            branches.push(self.branch(level + 1)?);
        }

        let else_branch = if self.at_indent(level) && self.accept(TokenClass::Else)? {
            Some(self.headed_block(level + 1)?)
        } else {
            None
        };

        Ok(Stmt::If {
            branches,
            else_branch,
        })
    }

    fn for_statement(&mut self, level: usize) -> Result<Stmt> {
        self.expect(TokenClass::For)?;
        let variable = self.expect(TokenClass::Identifier)?;
        self.expect(TokenClass::In)?;
        let iterable = self.expression()?;
        let body = self.headed_block(level + 1)?;

        Ok(Stmt::For {
            variable: variable.value,
            iterable,
            body,
        })
    }

    fn switch_statement(&mut self, level: usize) -> Result<Stmt> {
        self.expect(TokenClass::Switch)?;
        let subject = self.expression()?;
        self.expect(TokenClass::Colon)?;
        self.expect(TokenClass::Newline)?;

        let case_level = level + 1;
        let mut cases = Vec::new();
        let mut default = None;
        loop {
            while self.accept(TokenClass::Newline)? {}
            let token = self.current();
            if token.class == TokenClass::Eof || token.indent < case_level {
                break;
            }
            self.check_indent(case_level)?;

            if self.accept(TokenClass::Else)? {
                default = Some(self.headed_block(case_level + 1)?);
                break;
            }
            if !self.accept(TokenClass::Case)? {
                return Err(self.unexpected(&[TokenClass::Case, TokenClass::Else]));
            }
            cases.push(self.branch(case_level + 1)?);
        }

        if cases.is_empty() && default.is_none() {
            return Err(self.unexpected(&[TokenClass::Case, TokenClass::Else]));
        }

        Ok(Stmt::Switch {
            subject,
            cases,
            default,
        })
    }

    /// `expression ":" NEWLINE block`, the tail of `if`, `elif` and `case`.
    fn branch(&mut self, level: usize) -> Result<Branch> {
        let condition = self.expression()?;
        let body = self.headed_block(level)?;
        Ok(Branch { condition, body })
    }

    fn headed_block(&mut self, level: usize) -> Result<Vec<Stmt>> {
        self.expect(TokenClass::Colon)?;
        self.expect(TokenClass::Newline)?;
        self.block(level)
    }

    fn simple_statement(&mut self) -> Result<Stmt> {
        let name = self.current().clone();
        let stmt = if self.accept_lookahead(TokenClass::Identifier, TokenClass::Equal)? {
            Stmt::Attribute {
                value: self.expression()?,
                name: name.value,
                line: name.line,
            }
        } else {
            Stmt::Expression(self.expression()?)
        };
        self.end_of_statement()?;
        Ok(stmt)
    }

    fn end_of_statement(&mut self) -> Result<()> {
        if self.check(TokenClass::Eof) {
            Ok(())
        } else {
            self.expect(TokenClass::Newline).map(drop)
        }
    }

    fn expression(&mut self) -> Result<Expr> {
        let mut expr = self.term()?;

        while self.accept_any([
            TokenClass::Plus,
            TokenClass::Minus,
            TokenClass::And,
            TokenClass::Or,
        ])? {
            let operator = self.previous().clone();
            let right = Box::new(self.term()?);
            let left = Box::new(expr);
            expr = match operator.class {
                TokenClass::And | TokenClass::Or => Expr::Logical {
                    left,
                    operator,
                    right,
                },
                _ => Expr::Binary {
                    left,
                    operator,
                    right,
                },
            };
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut expr = self.factor()?;

        while self.accept_any([
            TokenClass::Equal,
            TokenClass::NotEqual,
            TokenClass::Gt,
            TokenClass::Gte,
            TokenClass::Lt,
            TokenClass::Lte,
        ])? {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr> {
        let token = self.current().clone();
        if self.accept(TokenClass::Identifier)? {
            if self.accept(TokenClass::Equal)? {
                let value = self.expression()?;
                return Ok(Expr::Assign {
                    name: token,
                    value: Box::new(value),
                });
            }
            Ok(Expr::Variable(token))
        } else if self.accept(TokenClass::String)? {
            Ok(Expr::Literal(Literal::from(token.value)))
        } else if self.accept(TokenClass::Int)? {
            let value = token.value.parse::<i64>().map_err(|_| ParseError::InvalidInteger {
                value: token.value.clone(),
                line: token.line,
                column: token.column,
            })?;
            Ok(Expr::Literal(Literal::from(value)))
        } else if self.accept(TokenClass::Bool)? {
            Ok(Expr::Literal(Literal::from(token.value == "true")))
        } else {
            Err(self.unexpected(&[
                TokenClass::Identifier,
                TokenClass::String,
                TokenClass::Int,
                TokenClass::Bool,
            ]))
        }
    }

    /// Consumes the current token if it is of class `class`.
    fn accept(&mut self, class: TokenClass) -> Result<bool> {
        if self.check(class) {
            self.scanner.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Accepts the first of `classes` that matches, in order.
    fn accept_any<const N: usize>(&mut self, classes: [TokenClass; N]) -> Result<bool> {
        for class in classes {
            if self.accept(class)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Accepts `class` followed by `next`. When only `class` matches, the
    /// cursor is rolled back so the parse continues as if nothing was tried.
    fn accept_lookahead(&mut self, class: TokenClass, next: TokenClass) -> Result<bool> {
        if !self.accept(class)? {
            return Ok(false);
        }
        if self.accept(next)? {
            return Ok(true);
        }
        trace!(class = class.name(), next = next.name(), "lookahead failed");
        self.scanner.rewind();
        Ok(false)
    }

    fn expect(&mut self, class: TokenClass) -> Result<Token> {
        let token = self.current().clone();
        if self.accept(class)? {
            Ok(token)
        } else {
            Err(self.unexpected(&[class]))
        }
    }

    fn check_indent(&self, level: usize) -> Result<()> {
        let token = self.current();
        if token.indent == level {
            Ok(())
        } else {
            Err(ParseError::UnexpectedIndent {
                expected: level,
                found: token.indent,
                line: token.line,
                column: token.column,
            })
        }
    }

    fn at_indent(&self, level: usize) -> bool {
        self.current().indent == level
    }

    #[inline]
    fn check(&self, class: TokenClass) -> bool {
        self.current().class == class
    }

    #[inline]
    fn current(&self) -> &Token {
        self.scanner.current()
    }

    fn previous(&self) -> &Token {
        self.scanner.previous().unwrap_or_else(|| self.current())
    }

    fn unexpected(&self, expected: &[TokenClass]) -> ParseError {
        let token = self.current();
        ParseError::Unexpected {
            expected: expected.to_vec(),
            found: token.class,
            value: token.value.clone(),
            line: token.line,
            column: token.column,
        }
    }
}

fn describe(classes: &[TokenClass]) -> String {
    match classes {
        [class] => format!("'{class}'"),
        _ => format!(
            "one of {}",
            classes.iter().map(|class| format!("'{class}'")).join(", ")
        ),
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("expected {}, found '{found}' at line {line}, column {column}", describe(.expected))]
    Unexpected {
        expected: Vec<TokenClass>,
        found: TokenClass,
        value: String,
        line: usize,
        column: usize,
    },
    #[error("unexpected indentation level {found} (expected {expected}) at line {line}, column {column}")]
    UnexpectedIndent {
        expected: usize,
        found: usize,
        line: usize,
        column: usize,
    },
    #[error("integer literal '{value}' out of range at line {line}, column {column}")]
    InvalidInteger {
        value: String,
        line: usize,
        column: usize,
    },
}

type Result<T> = std::result::Result<T, ParseError>;
