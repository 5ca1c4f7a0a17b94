//! Code generation: lower the parsed AST into x86-64 assembly.
//!
//! The emitter is a plain stack machine. Every sub-expression leaves exactly
//! one value on the stack; operators pop their two operands into `rdi`
//! (right) and `rax` (left), combine them into `rax` and push the result.

use tracing::debug;

use crate::parser::{BinaryOp, Node};

/// Assembler dialect of the emitted listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Syntax {
  /// `.intel_syntax noprefix`, destination first.
  #[default]
  Intel,
  /// GNU as default: `%` registers, `$` immediates, source first.
  Att,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
  pub syntax: Syntax,
  /// Global label of the generated routine.
  pub entry: String,
}

impl Default for CodegenOptions {
  fn default() -> Self {
    Self {
      syntax: Syntax::Intel,
      entry: "main".to_string(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reg {
  Rax,
  Rdi,
}

impl Reg {
  fn name(self) -> &'static str {
    match self {
      Self::Rax => "rax",
      Self::Rdi => "rdi",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Instr {
  PushImm(i64),
  Push(Reg),
  Pop(Reg),
  MovImm(Reg, i64),
  /// `dst op= src` for add, sub and imul.
  Arith(&'static str, Reg, Reg),
  Cqo,
  Idiv(Reg),
  Ret,
}

impl Instr {
  fn render(self, syntax: Syntax) -> String {
    match syntax {
      Syntax::Intel => match self {
        Self::PushImm(value) => format!("push {value}"),
        Self::Push(reg) => format!("push {}", reg.name()),
        Self::Pop(reg) => format!("pop {}", reg.name()),
        Self::MovImm(reg, value) => format!("mov {}, {value}", reg.name()),
        Self::Arith(op, dst, src) => format!("{op} {}, {}", dst.name(), src.name()),
        Self::Cqo => "cqo".to_string(),
        Self::Idiv(reg) => format!("idiv {}", reg.name()),
        Self::Ret => "ret".to_string(),
      },
      Syntax::Att => match self {
        Self::PushImm(value) => format!("push ${value}"),
        Self::Push(reg) => format!("push %{}", reg.name()),
        Self::Pop(reg) => format!("pop %{}", reg.name()),
        Self::MovImm(reg, value) => format!("movabs ${value}, %{}", reg.name()),
        Self::Arith(op, dst, src) => format!("{op} %{}, %{}", src.name(), dst.name()),
        Self::Cqo => "cqo".to_string(),
        Self::Idiv(reg) => format!("idiv %{}", reg.name()),
        Self::Ret => "ret".to_string(),
      },
    }
  }
}

/// Emit the instruction lines for `node`, leaving its value on the stack.
pub fn generate(node: &Node, syntax: Syntax) -> Vec<String> {
  let mut code = Vec::new();
  emit_expr(node, &mut code);
  code.into_iter().map(|instr| instr.render(syntax)).collect()
}

/// Emit a complete listing: directives, entry label, body and epilogue.
pub fn render_program(node: &Node, options: &CodegenOptions) -> String {
  let body = generate(node, options.syntax);
  debug!(instructions = body.len(), syntax = ?options.syntax, "generated code");

  let mut asm = String::new();
  if options.syntax == Syntax::Intel {
    asm.push_str(".intel_syntax noprefix\n");
  }
  asm.push_str(&format!(".globl {}\n", options.entry));
  asm.push_str(&format!("{}:\n", options.entry));
  for line in &body {
    asm.push_str(&format!("    {line}\n"));
  }

  // The whole expression's value is the only thing left on the stack.
  for instr in [Instr::Pop(Reg::Rax), Instr::Ret] {
    asm.push_str(&format!("    {}\n", instr.render(options.syntax)));
  }
  asm
}

fn emit_expr(node: &Node, code: &mut Vec<Instr>) {
  match node {
    Node::Num { value } => {
      // `push imm` only takes a sign-extended 32-bit immediate.
      if i32::try_from(*value).is_ok() {
        code.push(Instr::PushImm(*value));
      } else {
        code.push(Instr::MovImm(Reg::Rax, *value));
        code.push(Instr::Push(Reg::Rax));
      }
    }
    Node::Binary { op, lhs, rhs } => {
      emit_expr(lhs, code);
      emit_expr(rhs, code);
      code.push(Instr::Pop(Reg::Rdi));
      code.push(Instr::Pop(Reg::Rax));
      match op {
        BinaryOp::Add => code.push(Instr::Arith("add", Reg::Rax, Reg::Rdi)),
        BinaryOp::Sub => code.push(Instr::Arith("sub", Reg::Rax, Reg::Rdi)),
        BinaryOp::Mul => code.push(Instr::Arith("imul", Reg::Rax, Reg::Rdi)),
        BinaryOp::Div => {
          code.push(Instr::Cqo);
          code.push(Instr::Idiv(Reg::Rdi));
        }
      }
      code.push(Instr::Push(Reg::Rax));
    }
  }
}
