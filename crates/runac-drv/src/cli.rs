//! Command-line surface (§6.1, §10.2): positional `input`/`output` plus the
//! ambient flags that change auxiliary output without touching the exit-code
//! contract.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "runac", version, about = "Compiles source files to x86-64 GNU assembler text")]
pub struct Cli {
    /// Source file to compile.
    pub input: PathBuf,

    /// Where to write the generated assembly.
    pub output: PathBuf,

    /// Raise the tracing verbosity; repeatable (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Whether diagnostic output is colorized.
    #[arg(long, value_enum, default_value_t = Color::Auto)]
    pub color: Color,

    /// Dump the token stream to stderr before parsing.
    #[arg(long)]
    pub emit_tokens: bool,

    /// Dump the parsed program to stderr before codegen.
    #[arg(long)]
    pub emit_ast: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Color {
    Auto,
    Always,
    Never,
}

impl Color {
    pub fn should_colorize(self) -> bool {
        match self {
            Color::Always => true,
            Color::Never => false,
            Color::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}
