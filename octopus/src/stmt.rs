use crate::expr::Expr;

/// Everything recognized in one source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
	pub classes: Vec<ClassDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
	pub name: String,
	pub line: usize,
	pub body: Vec<Stmt>,
}

/// A managed entity such as `file "/etc/hosts":` and its nested statements.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceBlock {
	/// The resource keyword, e.g. `file`, `package` or `service`.
	pub kind: String,
	pub title: Expr,
	pub line: usize,
	pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
	pub condition: Expr,
	pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
	Resource(ResourceBlock),
	Attribute {
		name: String,
		line: usize,
		value: Expr,
	},
	/// `if` followed by any `elif`s, in source order.
	If {
		branches: Vec<Branch>,
		else_branch: Option<Vec<Stmt>>,
	},
	For {
		variable: String,
		iterable: Expr,
		body: Vec<Stmt>,
	},
	Switch {
		subject: Expr,
		cases: Vec<Branch>,
		default: Option<Vec<Stmt>>,
	},
	Expression(Expr),
}
