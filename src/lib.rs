//! Crate root: wires together the compilation pipeline.
//!
//! - `tokenizer` performs lexical analysis and produces a flat token vector.
//! - `parser` owns all syntactic knowledge and returns the expression AST.
//! - `codegen` lowers the AST into x86-64 stack-machine assembly.
//! - `error` holds the caret-style diagnostics shared by the front-end.

pub mod codegen;
pub mod error;
pub mod logs;
pub mod parser;
pub mod tokenizer;

pub use codegen::{CodegenOptions, Syntax};
pub use error::{CompileError, CompileResult};
pub use parser::{BinaryOp, Node};
pub use tokenizer::{Token, TokenKind};

/// Tokenize and parse `expr` into its AST.
pub fn parse_expression(expr: &str) -> CompileResult<Node> {
  let tokens = tokenizer::tokenize(expr)?;
  parser::parse(tokens, expr)
}

/// Compile an expression into an Intel-syntax listing with a `main` entry.
pub fn generate_assembly(expr: &str) -> CompileResult<String> {
  generate_assembly_with(expr, &CodegenOptions::default())
}

/// Compile an expression into a listing using the given options.
pub fn generate_assembly_with(expr: &str, options: &CodegenOptions) -> CompileResult<String> {
  let node = parse_expression(expr)?;
  Ok(codegen::render_program(&node, options))
}
