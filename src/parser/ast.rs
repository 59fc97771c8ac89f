//! # Abstract Syntax Tree
//!
//! A closed set of node variants, each carrying the originating token's span
//! for diagnostics. `PartialEq` is implemented by hand on the node types so
//! that two ASTs can be compared structurally while ignoring spans — this is
//! what the parse/pretty-print/re-parse round-trip test relies on ("AST
//! equivalent to the first, up to token positions").

use crate::error::Span;

#[derive(Debug, Clone)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

#[derive(Debug, Clone)]
pub struct TypeName {
    pub name: String,
    pub span: Span,
}

impl PartialEq for TypeName {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Import {
    Single(Ident),
    List(Vec<Ident>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDeclaration {
    pub name: Ident,
    pub ty: TypeName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    StringLiteral {
        value: String,
        span: Span,
    },
    NumberLiteral {
        value: i64,
        span: Span,
    },
    Identifier(Ident),
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    MethodCall {
        object: Ident,
        method: Ident,
        arguments: Vec<Expr>,
        span: Span,
    },
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        use Expr::*;
        match (self, other) {
            (StringLiteral { value: a, .. }, StringLiteral { value: b, .. }) => a == b,
            (NumberLiteral { value: a, .. }, NumberLiteral { value: b, .. }) => a == b,
            (Identifier(a), Identifier(b)) => a == b,
            (
                Binary {
                    op: oa,
                    left: la,
                    right: ra,
                    ..
                },
                Binary {
                    op: ob,
                    left: lb,
                    right: rb,
                    ..
                },
            ) => oa == ob && la == lb && ra == rb,
            (
                MethodCall {
                    object: oa,
                    method: ma,
                    arguments: aa,
                    ..
                },
                MethodCall {
                    object: ob,
                    method: mb,
                    arguments: ab,
                    ..
                },
            ) => oa == ob && ma == mb && aa == ab,
            _ => false,
        }
    }
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::StringLiteral { span, .. }
            | Expr::NumberLiteral { span, .. }
            | Expr::Binary { span, .. }
            | Expr::MethodCall { span, .. } => *span,
            Expr::Identifier(ident) => ident.span,
        }
    }

    /// Re-serialize this expression back into valid gmsl source text.
    pub fn to_source(&self) -> String {
        match self {
            Expr::StringLiteral { value, .. } => format!("\"{}\"", escape_for_source(value)),
            Expr::NumberLiteral { value, .. } => value.to_string(),
            Expr::Identifier(ident) => ident.name.clone(),
            Expr::Binary { op, left, right, .. } => {
                format!("{} {} {}", left.to_source(), op.symbol(), right.to_source())
            }
            Expr::MethodCall {
                object,
                method,
                arguments,
                ..
            } => {
                let args = arguments
                    .iter()
                    .map(Expr::to_source)
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("{}.{}({})", object.name, method.name, args)
            }
        }
    }
}

fn escape_for_source(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(Expr),
    If {
        condition: Expr,
        then_block: Vec<Stmt>,
        else_block: Option<Vec<Stmt>>,
        span: Span,
    },
    VarDecl {
        name: Ident,
        ty: TypeName,
    },
    VarAssign {
        name: Ident,
        value: Expr,
    },
    VarCreate {
        name: Ident,
        value: Expr,
    },
    Return {
        value: Expr,
        span: Span,
    },
}

impl PartialEq for Stmt {
    fn eq(&self, other: &Self) -> bool {
        use Stmt::*;
        match (self, other) {
            (Expr(a), Expr(b)) => a == b,
            (
                If {
                    condition: ca,
                    then_block: ta,
                    else_block: ea,
                    ..
                },
                If {
                    condition: cb,
                    then_block: tb,
                    else_block: eb,
                    ..
                },
            ) => ca == cb && ta == tb && ea == eb,
            (VarDecl { name: na, ty: ta }, VarDecl { name: nb, ty: tb }) => na == nb && ta == tb,
            (VarAssign { name: na, value: va }, VarAssign { name: nb, value: vb }) => {
                na == nb && va == vb
            }
            (VarCreate { name: na, value: va }, VarCreate { name: nb, value: vb }) => {
                na == nb && va == vb
            }
            (Return { value: a, .. }, Return { value: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Stmt {
    pub fn to_source(&self) -> String {
        match self {
            Stmt::Expr(e) => e.to_source(),
            Stmt::If {
                condition,
                then_block,
                else_block,
                ..
            } => {
                let then_src = then_block
                    .iter()
                    .map(Stmt::to_source)
                    .collect::<Vec<_>>()
                    .join(" ");
                match else_block {
                    Some(else_stmts) => {
                        let else_src = else_stmts
                            .iter()
                            .map(Stmt::to_source)
                            .collect::<Vec<_>>()
                            .join(" ");
                        format!(
                            "if {} {{ {} }} else {{ {} }}",
                            condition.to_source(),
                            then_src,
                            else_src
                        )
                    }
                    None => format!("if {} {{ {} }}", condition.to_source(), then_src),
                }
            }
            Stmt::VarDecl { name, ty } => format!("var {} {}", name.name, ty.name),
            Stmt::VarAssign { name, value } => format!("{} = {}", name.name, value.to_source()),
            Stmt::VarCreate { name, value } => format!("{} := {}", name.name, value.to_source()),
            Stmt::Return { value, .. } => format!("return {}", value.to_source()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: Ident,
    pub arguments: Vec<ArgumentDeclaration>,
    pub return_types: Vec<TypeName>,
    pub statements: Vec<Stmt>,
}

impl FunctionDeclaration {
    pub fn to_source(&self) -> String {
        let args = self
            .arguments
            .iter()
            .map(|a| format!("{} {}", a.name.name, a.ty.name))
            .collect::<Vec<_>>()
            .join(" ");
        let returns = self
            .return_types
            .iter()
            .map(|t| t.name.clone())
            .collect::<Vec<_>>()
            .join(" ");
        let body = self
            .statements
            .iter()
            .map(Stmt::to_source)
            .collect::<Vec<_>>()
            .join(" ");
        if returns.is_empty() {
            format!("func {}({}) {{ {} }}", self.name.name, args, body)
        } else {
            format!("func {}({}) {} {{ {} }}", self.name.name, args, returns, body)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Ident,
    pub imports: Vec<Import>,
    pub functions: Vec<FunctionDeclaration>,
}

impl Class {
    pub fn to_source(&self) -> String {
        let mut out = format!("package {}\n", self.name.name);
        for import in &self.imports {
            match import {
                Import::Single(name) => out.push_str(&format!("import \"{}\"\n", name.name)),
                Import::List(names) => {
                    out.push_str("import (\n");
                    for n in names {
                        out.push_str(&format!("  \"{}\"\n", n.name));
                    }
                    out.push_str(")\n");
                }
            }
        }
        for func in &self.functions {
            out.push_str(&func.to_source());
            out.push('\n');
        }
        out
    }
}
