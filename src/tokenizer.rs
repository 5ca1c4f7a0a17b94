//! Lexical analysis: turns the raw input string into a vector of tokens.
//!
//! The tokenizer knows nothing about the grammar. It recognises the six
//! single-character operators, decimal literals and whitespace, and rejects
//! everything else.

use std::fmt;

use tracing::debug;

use crate::error::{CompileError, CompileResult};

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  /// One of `+ - * / ( )`.
  Reserved(char),
  Num(i64),
  Eof,
}

/// A token together with the byte range it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub loc: usize,
  pub len: usize,
}

impl Token {
  pub fn new(kind: TokenKind, loc: usize, len: usize) -> Self {
    Self { kind, loc, len }
  }

  pub fn is_eof(&self) -> bool {
    self.kind == TokenKind::Eof
  }

  /// True if this is the reserved symbol `op`.
  pub fn is_reserved(&self, op: char) -> bool {
    self.kind == TokenKind::Reserved(op)
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.kind {
      TokenKind::Reserved(op) => write!(f, "{}\treserved '{op}'", self.loc),
      TokenKind::Num(value) => write!(f, "{}\tnum {value}", self.loc),
      TokenKind::Eof => write!(f, "{}\teof", self.loc),
    }
  }
}

const RESERVED: [u8; 6] = [b'+', b'-', b'*', b'/', b'(', b')'];

/// Lex the input into a flat vector of tokens terminated by an `Eof` marker.
pub fn tokenize(input: &str) -> CompileResult<Vec<Token>> {
  let mut tokens = Vec::new();
  let bytes = input.as_bytes();
  let mut i = 0;

  while i < bytes.len() {
    let c = bytes[i];
    // Same set as C `isspace`, which also counts vertical tab.
    if matches!(c, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r') {
      i += 1;
      continue;
    }

    if c.is_ascii_digit() {
      let start = i;
      while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
      }
      let value = input[start..i]
        .parse::<i64>()
        .map_err(|_| CompileError::tokenize_at(input, start, "number too large"))?;
      tokens.push(Token::new(TokenKind::Num(value), start, i - start));
      continue;
    }

    if RESERVED.contains(&c) {
      tokens.push(Token::new(TokenKind::Reserved(char::from(c)), i, 1));
      i += 1;
      continue;
    }

    let invalid_char = input[i..].chars().next().unwrap_or('\0');
    return Err(CompileError::tokenize_at(
      input,
      i,
      format!("invalid token: '{invalid_char}'"),
    ));
  }

  tokens.push(Token::new(TokenKind::Eof, input.len(), 0));
  debug!(count = tokens.len(), "tokenized input");
  Ok(tokens)
}

/// Return the slice from the source that produced this token.
pub fn token_text<'a>(token: &Token, source: &'a str) -> &'a str {
  source
    .get(token.loc..token.loc.saturating_add(token.len))
    .unwrap_or_default()
}

/// Human-friendly description used in diagnostics.
pub fn describe_token(token: &Token, source: &str) -> String {
  match token.kind {
    TokenKind::Eof => "EOF".to_string(),
    _ => token_text(token, source).to_string(),
  }
}
