use std::{borrow::Cow, fmt::Write};

use crate::{
    expr::Expr,
    literal::Literal,
    stmt::{Branch, Program, Stmt},
};

pub fn ast_to_string(expr: &Expr) -> Cow<'_, str> {
    match expr {
        Expr::Binary {
            left,
            operator,
            right,
        }
        | Expr::Logical {
            left,
            operator,
            right,
        } => parenthesize(&operator.value, &[left, right]).into(),
        Expr::Assign { name, value } => {
            format!("(= {} {})", name.value, ast_to_string(value)).into()
        }
        Expr::Literal(Literal::String(s)) => format!("{s:?}").into(),
        Expr::Literal(lit) => format!("{lit}").into(),
        Expr::Variable(name) => (&name.value).into(),
    }
}

fn parenthesize(name: &str, exprs: &[&Expr]) -> String {
    let mut str = String::new();
    str.push('(');
    str.push_str(name);
    for expr in exprs {
        str.push(' ');
        str.push_str(&ast_to_string(expr));
    }
    str.push(')');
    str
}

/// Indented outline of a program, one construct per line.
pub fn program_to_string(program: &Program) -> String {
    let mut out = String::new();
    for class in &program.classes {
        let _ = writeln!(out, "class {}", class.name);
        write_block(&mut out, &class.body, 1);
    }
    out
}

fn write_block(out: &mut String, body: &[Stmt], depth: usize) {
    for stmt in body {
        write_stmt(out, stmt, depth);
    }
}

fn write_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    let pad = "  ".repeat(depth);
    match stmt {
        Stmt::Resource(resource) => {
            let _ = writeln!(out, "{pad}{} {}", resource.kind, ast_to_string(&resource.title));
            write_block(out, &resource.body, depth + 1);
        }
        Stmt::Attribute { name, value, .. } => {
            let _ = writeln!(out, "{pad}{name} := {}", ast_to_string(value));
        }
        Stmt::If {
            branches,
            else_branch,
        } => {
            for (index, Branch { condition, body }) in branches.iter().enumerate() {
                let keyword = if index == 0 { "if" } else { "elif" };
                let _ = writeln!(out, "{pad}{keyword} {}", ast_to_string(condition));
                write_block(out, body, depth + 1);
            }
            if let Some(body) = else_branch {
                let _ = writeln!(out, "{pad}else");
                write_block(out, body, depth + 1);
            }
        }
        Stmt::For {
            variable,
            iterable,
            body,
        } => {
            let _ = writeln!(out, "{pad}for {variable} in {}", ast_to_string(iterable));
            write_block(out, body, depth + 1);
        }
        Stmt::Switch {
            subject,
            cases,
            default,
        } => {
            let _ = writeln!(out, "{pad}switch {}", ast_to_string(subject));
            for case in cases {
                let _ = writeln!(out, "{pad}  case {}", ast_to_string(&case.condition));
                write_block(out, &case.body, depth + 2);
            }
            if let Some(body) = default {
                let _ = writeln!(out, "{pad}  else");
                write_block(out, body, depth + 2);
            }
        }
        Stmt::Expression(expr) => {
            let _ = writeln!(out, "{pad}{}", ast_to_string(expr));
        }
    }
}
