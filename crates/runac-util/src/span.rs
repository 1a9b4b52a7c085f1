//! Source positions and the file(s) a compilation reads from.
//!
//! The source language's compiler only ever processes a single input file
//! per invocation (see the CLI contract), so `SourceMap` is little more than
//! a named buffer - but keeping it a distinct type means `runac-drv` doesn't
//! have to special-case "the one file" everywhere a path or byte buffer is
//! needed.

use std::path::{Path, PathBuf};

/// A 1-based line/column position, paired with its byte offset.
///
/// The lexer hands these out for every token; the parser and generator pass
/// them through diagnostics unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub const DUMMY: Span = Span {
        offset: 0,
        line: 0,
        column: 0,
    };

    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

/// The source file being compiled.
pub struct SourceFile {
    pub path: PathBuf,
    pub contents: String,
}

impl SourceFile {
    pub fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let contents = std::fs::read_to_string(&path)?;
        Ok(Self { path, contents })
    }
}

/// Holds the single file a `runac` invocation compiles.
///
/// A multi-file driver would generalize this to a `Vec<SourceFile>` indexed
/// by a `FileId`, the way a typical compiler's source map works; the source
/// language has no module system beyond the purely cosmetic `Import`
/// statement (see §3.4), so one file is all there ever is.
pub struct SourceMap {
    pub file: SourceFile,
}

impl SourceMap {
    pub fn new(file: SourceFile) -> Self {
        Self { file }
    }
}
