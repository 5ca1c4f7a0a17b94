//! Recursive-descent parser producing the expression AST.
//!
//! Precedence is encoded by the call hierarchy rather than a table:
//!
//! ```text
//! expr    = mul ( ("+" | "-") mul )*
//! mul     = primary ( ("*" | "/") primary )*
//! primary = "(" expr ")" | number
//! ```
//!
//! Both loops fold to the left, which makes every operator left-associative.

use std::fmt;

use tracing::{debug, trace};

use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{Token, TokenKind, describe_token};

/// Binary operators recognised by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
}

impl BinaryOp {
  fn from_symbol(op: char) -> Option<Self> {
    match op {
      '+' => Some(Self::Add),
      '-' => Some(Self::Sub),
      '*' => Some(Self::Mul),
      '/' => Some(Self::Div),
      _ => None,
    }
  }

  pub fn symbol(self) -> char {
    match self {
      Self::Add => '+',
      Self::Sub => '-',
      Self::Mul => '*',
      Self::Div => '/',
    }
  }
}

/// Expression tree produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
  Num {
    value: i64,
  },
  Binary {
    op: BinaryOp,
    lhs: Box<Node>,
    rhs: Box<Node>,
  },
}

impl Node {
  pub fn number(value: i64) -> Self {
    Self::Num { value }
  }

  pub fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Self {
    Self::Binary {
      op,
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    }
  }
}

/// Renders the tree as an S-expression, e.g. `(+ 2 (* 3 4))`.
impl fmt::Display for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Num { value } => write!(f, "{value}"),
      Self::Binary { op, lhs, rhs } => write!(f, "({} {lhs} {rhs})", op.symbol()),
    }
  }
}

/// Parse a whole token stream into a single expression.
pub fn parse(tokens: Vec<Token>, source: &str) -> CompileResult<Node> {
  let mut stream = TokenStream::new(tokens, source);
  let node = parse_expr(&mut stream)?;

  let token = stream.peek();
  if !token.is_eof() {
    let got = describe_token(&token, source);
    return Err(CompileError::parse_at(
      source,
      token.loc,
      format!("unexpected token \"{got}\""),
    ));
  }

  debug!(ast = %node, "parsed expression");
  Ok(node)
}

fn parse_expr(stream: &mut TokenStream<'_>) -> CompileResult<Node> {
  let mut node = parse_mul(stream)?;

  while let Some(op) = stream.consume_op(&['+', '-']) {
    let rhs = parse_mul(stream)?;
    node = Node::binary(op, node, rhs);
  }

  Ok(node)
}

fn parse_mul(stream: &mut TokenStream<'_>) -> CompileResult<Node> {
  let mut node = parse_primary(stream)?;

  while let Some(op) = stream.consume_op(&['*', '/']) {
    let rhs = parse_primary(stream)?;
    node = Node::binary(op, node, rhs);
  }

  Ok(node)
}

fn parse_primary(stream: &mut TokenStream<'_>) -> CompileResult<Node> {
  if stream.equal('(') {
    let node = parse_expr(stream)?;
    stream.skip(')')?;
    return Ok(node);
  }

  let value = stream.get_number()?;
  Ok(Node::number(value))
}

/// Cursor over the token vector, owned by a single `parse` call.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
}

impl<'a> TokenStream<'a> {
  fn new(mut tokens: Vec<Token>, source: &'a str) -> Self {
    // Callers outside `tokenize` may hand us a vector without the sentinel.
    if !tokens.last().is_some_and(Token::is_eof) {
      tokens.push(Token::new(TokenKind::Eof, source.len(), 0));
    }
    Self {
      tokens,
      source,
      pos: 0,
    }
  }

  /// The current token. Never runs past the trailing `Eof`.
  fn peek(&self) -> Token {
    self.tokens[self.pos.min(self.tokens.len() - 1)]
  }

  fn advance(&mut self) {
    if !self.peek().is_eof() {
      trace!(pos = self.pos, "consumed token");
      self.pos += 1;
    }
  }

  /// Consume the current token if it is the reserved symbol `op`.
  fn equal(&mut self, op: char) -> bool {
    if self.peek().is_reserved(op) {
      self.advance();
      return true;
    }
    false
  }

  /// Consume the current token if it is one of `ops`, returning its operator.
  fn consume_op(&mut self, ops: &[char]) -> Option<BinaryOp> {
    let TokenKind::Reserved(symbol) = self.peek().kind else {
      return None;
    };
    if !ops.contains(&symbol) {
      return None;
    }
    let op = BinaryOp::from_symbol(symbol)?;
    self.advance();
    Some(op)
  }

  fn skip(&mut self, op: char) -> CompileResult<()> {
    if self.equal(op) {
      return Ok(());
    }
    let token = self.peek();
    let got = describe_token(&token, self.source);
    Err(CompileError::parse_at(
      self.source,
      token.loc,
      format!("expected \"{op}\", but got \"{got}\""),
    ))
  }

  fn get_number(&mut self) -> CompileResult<i64> {
    let token = self.peek();
    if let TokenKind::Num(value) = token.kind {
      self.advance();
      return Ok(value);
    }
    let got = describe_token(&token, self.source);
    Err(CompileError::parse_at(
      self.source,
      token.loc,
      format!("expected a number, but got \"{got}\""),
    ))
  }
}
