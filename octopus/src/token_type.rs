use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
	Eof,

	// literals
	String,
	Int,
	Identifier,
	Bool,

	Newline,

	// single character
	Colon,
	Equal,
	Plus,
	Minus,
	Comma,
	Point,
	LeftParen,
	RightParen,
	Hash,
	LeftBracket,
	RightBracket,
	LeftBrace,
	RightBrace,

	// relational
	NotEqual,
	Gt,
	Gte,
	Lt,
	Lte,

	// logical
	And,
	Or,
	In,

	// keywords
	ClassDef,
	If,
	Else,
	Elif,
	For,
	Switch,
	Case,
	ResourceStmt,

	Undefined,
}

impl TokenClass {
	/// Stable identifier of the class, e.g. `RESOURCE_STMT`.
	pub fn name(self) -> &'static str {
		match self {
			TokenClass::Eof => "EOF",
			TokenClass::String => "STRING",
			TokenClass::Int => "INT",
			TokenClass::Identifier => "IDENTIFIER",
			TokenClass::Bool => "BOOL",
			TokenClass::Newline => "NEWLINE",
			TokenClass::Colon => "COLON",
			TokenClass::Equal => "EQUAL",
			TokenClass::Plus => "PLUS",
			TokenClass::Minus => "MINUS",
			TokenClass::Comma => "COMMA",
			TokenClass::Point => "POINT",
			TokenClass::LeftParen => "LEFT_PAREN",
			TokenClass::RightParen => "RIGHT_PAREN",
			TokenClass::Hash => "HASH",
			TokenClass::LeftBracket => "LEFT_BRACKET",
			TokenClass::RightBracket => "RIGHT_BRACKET",
			TokenClass::LeftBrace => "LEFT_BRACE",
			TokenClass::RightBrace => "RIGHT_BRACE",
			TokenClass::NotEqual => "NOT_EQUAL",
			TokenClass::Gt => "GT",
			TokenClass::Gte => "GTE",
			TokenClass::Lt => "LT",
			TokenClass::Lte => "LTE",
			TokenClass::And => "AND",
			TokenClass::Or => "OR",
			TokenClass::In => "IN",
			TokenClass::ClassDef => "CLASS_DEF",
			TokenClass::If => "IF",
			TokenClass::Else => "ELSE",
			TokenClass::Elif => "ELIF",
			TokenClass::For => "FOR",
			TokenClass::Switch => "SWITCH",
			TokenClass::Case => "CASE",
			TokenClass::ResourceStmt => "RESOURCE_STMT",
			TokenClass::Undefined => "UNDEFINED",
		}
	}

	/// Text shown to users in diagnostics.
	pub fn text(self) -> &'static str {
		match self {
			TokenClass::Eof => "end of file",
			TokenClass::String => "string",
			TokenClass::Int => "integer",
			TokenClass::Identifier => "identifier",
			TokenClass::Bool => "boolean",
			TokenClass::Newline => "new line",
			TokenClass::Colon => ":",
			TokenClass::Equal => "=",
			TokenClass::Plus => "+",
			TokenClass::Minus => "-",
			TokenClass::Comma => ",",
			TokenClass::Point => ".",
			TokenClass::LeftParen => "(",
			TokenClass::RightParen => ")",
			TokenClass::Hash => "#",
			TokenClass::LeftBracket => "[",
			TokenClass::RightBracket => "]",
			TokenClass::LeftBrace => "{",
			TokenClass::RightBrace => "}",
			TokenClass::NotEqual => "!=",
			TokenClass::Gt => ">",
			TokenClass::Gte => ">=",
			TokenClass::Lt => "<",
			TokenClass::Lte => "<=",
			TokenClass::And => "and",
			TokenClass::Or => "or",
			TokenClass::In => "in",
			TokenClass::ClassDef => "class",
			TokenClass::If => "if",
			TokenClass::Else => "else",
			TokenClass::Elif => "elif",
			TokenClass::For => "for",
			TokenClass::Switch => "switch",
			TokenClass::Case => "case",
			TokenClass::ResourceStmt => "resource",
			TokenClass::Undefined => "undefined",
		}
	}
}

impl fmt::Display for TokenClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.text())
	}
}
