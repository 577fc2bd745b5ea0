use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    String(Cow<'static, str>),
    Integer(i64),
    Boolean(bool),
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<&'static str> for Literal {
    fn from(s: &'static str) -> Self {
        Self::String(s.into())
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::String(s) => s.fmt(f),
            Literal::Integer(n) => n.fmt(f),
            Literal::Boolean(b) => b.fmt(f),
        }
    }
}
