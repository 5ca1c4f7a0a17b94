//! Diagnostics shared by the tokenizer and the parser.
//!
//! Every error is anchored at a byte offset into the source and renders in
//! the chibicc style: the input echoed back, then a caret under the
//! offending character followed by the message.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum CompileError {
  /// Lexical failure: an unrecognised character or a literal that does not
  /// fit in `i64`.
  #[snafu(display("{}", render(source_line, *loc, message)))]
  Tokenize {
    source_line: String,
    loc: usize,
    message: String,
  },
  /// The grammar expected something other than the token it found.
  #[snafu(display("{}", render(source_line, *loc, message)))]
  Parse {
    source_line: String,
    loc: usize,
    message: String,
  },
}

impl CompileError {
  /// Lexical error at byte offset `loc` of `source`.
  pub fn tokenize_at(source: &str, loc: usize, message: impl Into<String>) -> Self {
    Self::Tokenize {
      source_line: source.to_string(),
      loc: loc.min(source.len()),
      message: message.into(),
    }
  }

  /// Syntax error at byte offset `loc` of `source`.
  pub fn parse_at(source: &str, loc: usize, message: impl Into<String>) -> Self {
    Self::Parse {
      source_line: source.to_string(),
      loc: loc.min(source.len()),
      message: message.into(),
    }
  }

  pub fn loc(&self) -> usize {
    match self {
      Self::Tokenize { loc, .. } | Self::Parse { loc, .. } => *loc,
    }
  }

  pub fn message(&self) -> &str {
    match self {
      Self::Tokenize { message, .. } | Self::Parse { message, .. } => message,
    }
  }
}

fn render(source_line: &str, loc: usize, message: &str) -> String {
  // `loc` always sits on a char boundary: the tokenizer only steps over ASCII.
  let prefix = source_line.get(..loc).unwrap_or(source_line);
  let column = prefix.chars().count();
  format!("{source_line}\n{}^ {message}", " ".repeat(column))
}
