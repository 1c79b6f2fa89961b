//! Command handlers for the sprig CLI.
//!
//! Each submodule implements one command. Shared helpers for reading input
//! and locating errors live here.

use sprig_lexer_core::SourceBuffer;
use sprig_parse::ParseError;

mod check;
mod debug;

pub use check::{check_files, check_source, run_check, FileReport};
pub use debug::{format_tokens, lex_file, parse_file, parse_options, render_parse, ParseOptions};

/// Read a source file, exiting with a message if it cannot be read.
pub(crate) fn read_file(path: &str) -> String {
    match try_read_file(path) {
        Ok(content) => content,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

pub(crate) fn try_read_file(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
        std::io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
        std::io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
        _ => format!("error reading '{path}': {e}"),
    })
}

/// `line:col: message`, or just the message for errors without a token.
pub fn describe_error(source: &SourceBuffer, err: &ParseError) -> String {
    match err.token() {
        Some(token) => format!("{}: {err}", source.location(token.start)),
        None => err.to_string(),
    }
}
