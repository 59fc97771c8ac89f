//! # gmsl
//!
//! Lexer, parser, compiler, and bytecode VM for the scripting language a
//! MUD's world behavior is written in.
//!
//! ## Pipeline
//!
//! 1. **Lexer** — source text to a one-token-lookahead stream of [`lexer::Token`]s.
//! 2. **Parser** — recursive-descent, two-token lookahead, into a [`parser::ast::Class`].
//! 3. **Compiler** — one pass over the AST into a per-function [`compiler::Assembly`]:
//!    an ordered entry list, a deduplicated string pool, dense register
//!    assignment, and two-pass label fixups for branches.
//! 4. **Loader** — translates compiled entries into the closed [`vm::op::Op`]
//!    set, resolving every label to a concrete instruction index.
//! 5. **Execution engine** — runs loaded opcodes against a bounded per-call
//!    [`vm::frame`], dispatching nested `CALL`s to either scripted or host
//!    ([`host::ContextProvider`]-backed) methods.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gmsl::{compiler::Compiler, parser};
//!
//! let source = std::fs::read_to_string("mudlib/Greeter.gms").unwrap();
//! let class = parser::parse(&source).expect("lex/parse failure");
//! let assembly = Compiler::compile(&class).expect("compile failure");
//! println!("compiled {} function(s)", assembly.functions.len());
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod host;
pub mod lexer;
pub mod parser;
pub mod vm;
