use std::process;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use tracing::debug;

use exprcc::logs::init_tracing;
use exprcc::{CodegenOptions, CompileResult, Syntax, codegen, parse_expression, tokenizer};

#[derive(Debug, Parser)]
#[command(name = "exprcc", version)]
#[command(about = "Compile an arithmetic expression into x86-64 assembly", long_about = None)]
struct Cli {
  /// Expression to compile, e.g. "(2 + 3) * 4"
  #[arg(value_name = "EXPR", allow_hyphen_values = true)]
  expr: String,

  /// Assembler dialect of the listing
  #[arg(long, value_enum, default_value_t = SyntaxArg::Intel)]
  syntax: SyntaxArg,

  /// Label of the generated routine
  #[arg(long, value_name = "NAME", default_value = "main")]
  entry: String,

  /// Pipeline stage to print
  #[arg(long, value_enum, default_value_t = Emit::Asm)]
  emit: Emit,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SyntaxArg {
  Intel,
  Att,
}

impl From<SyntaxArg> for Syntax {
  fn from(arg: SyntaxArg) -> Self {
    match arg {
      SyntaxArg::Intel => Self::Intel,
      SyntaxArg::Att => Self::Att,
    }
  }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Emit {
  Tokens,
  Ast,
  Asm,
}

fn run(cli: &Cli) -> CompileResult<String> {
  match cli.emit {
    Emit::Tokens => {
      let tokens = tokenizer::tokenize(&cli.expr)?;
      Ok(tokens.iter().map(|token| format!("{token}\n")).collect())
    }
    Emit::Ast => Ok(format!("{}\n", parse_expression(&cli.expr)?)),
    Emit::Asm => {
      let options = CodegenOptions {
        syntax: cli.syntax.into(),
        entry: cli.entry.clone(),
      };
      let node = parse_expression(&cli.expr)?;
      Ok(codegen::render_program(&node, &options))
    }
  }
}

fn main() {
  init_tracing();

  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
      err.exit()
    }
    Err(err) => {
      let _ = err.print();
      process::exit(1);
    }
  };
  debug!(?cli, "starting compilation");

  match run(&cli) {
    Ok(output) => print!("{output}"),
    Err(err) => {
      eprintln!("{err}");
      process::exit(1);
    }
  }
}
