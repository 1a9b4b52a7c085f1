//! runac-drv - compiler driver.
//!
//! Orchestrates the three pipeline stages (`runac-lex`/`runac-par` for
//! lexing+parsing, `runac-sem` for the type table, `runac-gen` for codegen)
//! and owns the one `Handler` a run uses (§10.1, §10.3). Every lex/parse/
//! codegen error is fatal inside the `Handler` itself - nothing in this
//! crate ever sees a `Result` from those stages to decide whether to
//! recover. The only fallible operations this crate owns are the input read
//! and the output write, which happen before any `Handler` exists and are
//! therefore plain `anyhow` I/O.

pub mod cli;

use std::fs;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use runac_lex::{Lexer, TokenKind};
use runac_util::Handler;

pub use cli::Cli;

/// Installs the `tracing_subscriber::fmt` layer honoring `RUST_LOG`, gated
/// behind `-v`/`--verbose` (§10.1): no flag and no `RUST_LOG` set means
/// `warn`-level only, and each `-v` raises the default filter by one level.
pub fn init_tracing(verbose: u8, color: &cli::Color) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(color.should_colorize())
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the full `input -> output` pipeline described in §2 / §6.1. Returns
/// an error only for the driver-boundary I/O failures it owns; a lex,
/// parse, or codegen error exits the process directly via `Handler::fatal`
/// and never reaches this function's return.
pub fn compile(cli: &Cli) -> anyhow::Result<()> {
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("could not read '{}'", cli.input.display()))?;

    tracing::debug!(path = %cli.input.display(), bytes = source.len(), "lexing started");

    let handler = Handler::new();

    if cli.emit_tokens {
        emit_tokens(&source, &handler);
    }

    let mut parser = runac_par::Parser::new(&source, &handler);
    let program = parser.parse_program();
    tracing::debug!(
        functions = program.functions.len(),
        types = program.types.len(),
        globals = program.globals.len(),
        "parse tree built"
    );

    if cli.emit_ast {
        eprintln!("{program:#?}");
    }

    let types = runac_sem::TypeTable::from_program(&program, &handler);
    let assembly = runac_gen::generate(&program, &types, &handler);
    tracing::debug!(bytes = assembly.len(), path = %cli.output.display(), "codegen emitted assembly");

    fs::write(&cli.output, &assembly)
        .with_context(|| format!("could not write '{}'", cli.output.display()))?;

    println!(
        "Successfully compiled '{}' to '{}'",
        cli.input.display(),
        cli.output.display()
    );
    Ok(())
}

/// Re-lexes `source` independently of the parser (which tokenizes into its
/// own private buffer) purely to satisfy `--emit-tokens`; this duplicates
/// the scan but keeps the parser's token buffer private, matching how the
/// teacher keeps lexing a throwaway concern for anything other than parsing.
fn emit_tokens(source: &str, handler: &Handler) {
    let mut lexer = Lexer::new(source, handler);
    loop {
        let tok = lexer.next_token();
        let done = tok.kind == TokenKind::Eof;
        eprintln!("{tok:?}");
        if done {
            break;
        }
    }
}
