use crate::{literal::Literal, token::Token};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `+` and `-` on the additive tier, comparisons on the relational tier.
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Literal(Literal),
    /// `and` / `or`, which share the additive tier.
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Variable(Token),
    Assign {
        name: Token,
        value: Box<Expr>,
    },
}
