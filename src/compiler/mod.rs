//! # Compiler
//!
//! Walks a parsed [`crate::parser::ast::Class`] once and lowers each function
//! to an [`assembly::Assembly`] entry: an ordered instruction list, a
//! deduplicated string pool, and a dense identifier-to-register map.
//!
//! Nothing here resolves jump labels to instruction indices — that's the
//! loader's job (`crate::vm::loader`). The compiler only generates the label
//! names and leaves them as symbolic references on `Jump`/`JumpIfFalse`
//! entries, per the two-pass split the language's pipeline uses.

pub mod assembly;

#[cfg(test)]
mod tests;

use crate::error::CompileError;
use crate::parser::ast::{Class, Expr, FunctionDeclaration, Stmt};
use assembly::{CompiledType, Entry, FunctionInfo};

pub use assembly::Assembly;

/// Names resolvable through the VM's context provider rather than treated as
/// plain strings when they appear as a method call's receiver.
fn is_context_name(name: &str) -> bool {
    matches!(name, "player" | "room" | "item")
}

pub struct Compiler;

impl Compiler {
    pub fn compile(class: &Class) -> Result<Assembly, CompileError> {
        let mut functions = Vec::with_capacity(class.functions.len());
        for function in &class.functions {
            functions.push(Self::compile_function(function)?);
        }
        Ok(Assembly { functions })
    }

    fn compile_function(function: &FunctionDeclaration) -> Result<FunctionInfo, CompileError> {
        let mut f = FunctionInfo::new(function.name.name.clone());

        for arg in &function.arguments {
            let ty = resolve_type(&arg.ty.name, arg.ty.span)?;
            let register = f.add_argument(&arg.name.name, ty);
            f.add_entry(Entry::PopToRegister {
                register,
                span: arg.name.span,
            });
        }

        for ty in &function.return_types {
            f.returns.push(resolve_type(&ty.name, ty.span)?);
        }

        for stmt in &function.statements {
            compile_statement(stmt, &mut f)?;
        }

        f.add_entry(Entry::Return {
            span: function.name.span,
        });
        Ok(f)
    }
}

fn resolve_type(name: &str, span: crate::error::Span) -> Result<CompiledType, CompileError> {
    CompiledType::from_name(name).ok_or_else(|| CompileError::UnknownType {
        span,
        name: name.to_string(),
    })
}

fn compile_statement(stmt: &Stmt, f: &mut FunctionInfo) -> Result<(), CompileError> {
    match stmt {
        Stmt::Expr(expr) => compile_expr(expr, f),
        Stmt::VarDecl { name, ty } => {
            let ty = resolve_type(&ty.name, ty.span)?;
            f.declare_identifier(&name.name, ty);
            Ok(())
        }
        Stmt::VarAssign { name, value } => {
            compile_expr(value, f)?;
            let register = f
                .register_of(&name.name)
                .ok_or_else(|| CompileError::UnboundIdentifier {
                    span: name.span,
                    name: name.name.clone(),
                })?;
            f.add_entry(Entry::PopToRegister {
                register,
                span: name.span,
            });
            Ok(())
        }
        Stmt::VarCreate { name, value } => {
            compile_expr(value, f)?;
            let register = f.declare_identifier(&name.name, CompiledType::Str);
            f.add_entry(Entry::PopToRegister {
                register,
                span: name.span,
            });
            Ok(())
        }
        Stmt::Return { value, span } => {
            compile_expr(value, f)?;
            f.add_entry(Entry::Return { span: *span });
            Ok(())
        }
        Stmt::If {
            condition,
            then_block,
            else_block,
            span,
        } => compile_if(condition, then_block, else_block.as_deref(), *span, f),
    }
}

fn compile_if(
    condition: &Expr,
    then_block: &[Stmt],
    else_block: Option<&[Stmt]>,
    span: crate::error::Span,
    f: &mut FunctionInfo,
) -> Result<(), CompileError> {
    compile_expr(condition, f)?;

    let skip_then_label = format!(".if_jump_{}", f.next_label_seed());
    f.add_entry(Entry::JumpIfFalse {
        label: skip_then_label.clone(),
        span,
    });

    for stmt in then_block {
        compile_statement(stmt, f)?;
    }

    let end_label = format!(".if_jump_end_{}", f.next_label_seed());
    f.add_entry(Entry::Jump {
        label: end_label.clone(),
        span,
    });
    f.add_entry(Entry::Label {
        name: skip_then_label,
        span,
    });

    if let Some(else_block) = else_block {
        for stmt in else_block {
            compile_statement(stmt, f)?;
        }
    }

    f.add_entry(Entry::Label {
        name: end_label,
        span,
    });
    f.add_entry(Entry::NoOp { span });
    Ok(())
}

/// Emits an expression in post-order: operands before operators, arguments
/// before the call they feed.
fn compile_expr(expr: &Expr, f: &mut FunctionInfo) -> Result<(), CompileError> {
    match expr {
        Expr::StringLiteral { value, span } => {
            let idx = f.add_string(value);
            f.add_entry(Entry::PushString {
                pool_index: idx,
                span: *span,
            });
            Ok(())
        }
        Expr::NumberLiteral { value, span } => {
            f.add_entry(Entry::PushNumber {
                value: *value,
                span: *span,
            });
            Ok(())
        }
        Expr::Identifier(ident) => {
            let register =
                f.register_of(&ident.name)
                    .ok_or_else(|| CompileError::UnboundIdentifier {
                        span: ident.span,
                        name: ident.name.clone(),
                    })?;
            f.add_entry(Entry::PushFromRegister {
                register,
                span: ident.span,
            });
            Ok(())
        }
        Expr::Binary {
            op, left, right, span,
        } => {
            compile_expr(left, f)?;
            compile_expr(right, f)?;
            f.add_entry(Entry::BinOp { op: *op, span: *span });
            Ok(())
        }
        Expr::MethodCall {
            object,
            method,
            arguments,
            span,
        } => {
            for arg in arguments {
                compile_expr(arg, f)?;
            }
            let method_idx = f.add_string(&method.name);
            f.add_entry(Entry::PushString {
                pool_index: method_idx,
                span: method.span,
            });
            let object_idx = f.add_string(&object.name);
            if is_context_name(&object.name) {
                f.add_entry(Entry::PushContext {
                    pool_index: object_idx,
                    span: object.span,
                });
            } else {
                f.add_entry(Entry::PushString {
                    pool_index: object_idx,
                    span: object.span,
                });
            }
            f.add_entry(Entry::Call { span: *span });
            Ok(())
        }
    }
}
