//! Tiny x86-64 subset interpreter for the Intel listings the compiler emits.

#![allow(dead_code)]

use exprcc::{BinaryOp, Node};

#[derive(Debug, Default)]
struct Machine {
  rax: i64,
  rdi: i64,
  rdx: i64,
  stack: Vec<i64>,
}

impl Machine {
  fn reg(&mut self, name: &str) -> Result<&mut i64, String> {
    match name {
      "rax" => Ok(&mut self.rax),
      "rdi" => Ok(&mut self.rdi),
      "rdx" => Ok(&mut self.rdx),
      _ => Err(format!("unknown register {name}")),
    }
  }

  fn pop(&mut self) -> Result<i64, String> {
    self.stack.pop().ok_or_else(|| "pop from empty stack".to_string())
  }
}

/// Run the listing from its entry label to `ret` and return `rax`.
pub fn execute(asm: &str) -> Result<i64, String> {
  let mut machine = Machine::default();
  let body = asm
    .lines()
    .skip_while(|line| !line.ends_with(':'))
    .skip(1)
    .map(str::trim);

  for line in body {
    let (mnemonic, operands) = line.split_once(' ').unwrap_or((line, ""));
    let operands: Vec<&str> = operands.split(", ").filter(|s| !s.is_empty()).collect();
    match (mnemonic, operands.as_slice()) {
      ("push", [src]) => {
        let value = match src.parse::<i64>() {
          Ok(value) => value,
          Err(_) => *machine.reg(src)?,
        };
        machine.stack.push(value);
      }
      ("pop", [dst]) => {
        let value = machine.pop()?;
        *machine.reg(dst)? = value;
      }
      ("mov", [dst, imm]) => {
        let value = imm.parse::<i64>().map_err(|e| e.to_string())?;
        *machine.reg(dst)? = value;
      }
      ("add" | "sub" | "imul", [dst, src]) => {
        let rhs = *machine.reg(src)?;
        let lhs = machine.reg(dst)?;
        *lhs = match mnemonic {
          "add" => lhs.wrapping_add(rhs),
          "sub" => lhs.wrapping_sub(rhs),
          _ => lhs.wrapping_mul(rhs),
        };
      }
      ("cqo", []) => machine.rdx = if machine.rax < 0 { -1 } else { 0 },
      ("idiv", [src]) => {
        let divisor = *machine.reg(src)?;
        let sign_ok = machine.rdx == if machine.rax < 0 { -1 } else { 0 };
        if divisor == 0 || !sign_ok {
          return Err("#DE divide error".to_string());
        }
        let quotient = machine.rax.checked_div(divisor).ok_or("#DE divide error")?;
        machine.rdx = machine.rax % divisor;
        machine.rax = quotient;
      }
      ("ret", []) => {
        if !machine.stack.is_empty() {
          return Err(format!("{} values left on the stack", machine.stack.len()));
        }
        return Ok(machine.rax);
      }
      _ => return Err(format!("unsupported instruction: {line}")),
    }
  }

  Err("listing fell off the end without ret".to_string())
}

/// Evaluate `expr` by compiling it and running the listing.
pub fn run(expr: &str) -> i64 {
  let asm = exprcc::generate_assembly(expr).unwrap();
  execute(&asm).unwrap()
}

/// Reference semantics: `None` where the hardware would fault.
pub fn eval(node: &Node) -> Option<i64> {
  match node {
    Node::Num { value } => Some(*value),
    Node::Binary { op, lhs, rhs } => {
      let (lhs, rhs) = (eval(lhs)?, eval(rhs)?);
      match op {
        BinaryOp::Add => Some(lhs.wrapping_add(rhs)),
        BinaryOp::Sub => Some(lhs.wrapping_sub(rhs)),
        BinaryOp::Mul => Some(lhs.wrapping_mul(rhs)),
        BinaryOp::Div => lhs.checked_div(rhs),
      }
    }
  }
}
