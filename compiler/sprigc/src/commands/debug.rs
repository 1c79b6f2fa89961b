//! Debug commands: `lex` and `parse` for inspecting the front end.

use std::fmt::Write;

use sprig_ir::DEFAULT_MAX_DEPTH;
use sprig_lexer_core::{SourceBuffer, State, TokenTag, Tokenizer, TokenizerFlags};
use sprig_parse::parse_source;

use super::{describe_error, read_file};

/// Options for `sprigc parse`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Depth at which the dump elides subtrees.
    pub max_dump_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_dump_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Parse `parse` command flags.
pub fn parse_options(args: &[String]) -> Result<ParseOptions, String> {
    let mut options = ParseOptions::default();
    for arg in args {
        if let Some(value) = arg.strip_prefix("--max-depth=") {
            options.max_dump_depth = value
                .parse()
                .map_err(|_| format!("invalid --max-depth value '{value}'"))?;
        } else if arg.starts_with('-') {
            return Err(format!("unknown option '{arg}'"));
        }
    }
    Ok(options)
}

/// One line per token: `line:col tag "text"`, ending with the `eof` line.
///
/// With `TRACK_INDENTATION` the listing starts with the first line's
/// `indent`, as the parser sees it.
pub fn format_tokens(source: &SourceBuffer, flags: TokenizerFlags) -> String {
    let mut out = String::new();
    let mut tokens = Tokenizer::with_flags(source, flags);
    let mut state = if tokens.flags().contains(TokenizerFlags::TRACK_INDENTATION) {
        State::LineStart
    } else {
        State::Start
    };
    loop {
        let token = tokens.next_from(state);
        state = State::Start;
        let text = String::from_utf8_lossy(source.text(token));
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{} {} {text:?}", tokens.location(), token.tag.name());
        if token.tag == TokenTag::Eof {
            return out;
        }
    }
}

/// Lex a file and print its token stream.
pub fn lex_file(path: &str, spaces: bool) {
    let content = read_file(path);
    let source = SourceBuffer::new(&content);
    let mut flags = TokenizerFlags::PARSER;
    flags.set(TokenizerFlags::EMIT_SPACES, spaces);
    print!("{}", format_tokens(&source, flags));
}

/// The tree dump of `text`, or a located error message.
pub fn render_parse(text: &str, options: ParseOptions) -> Result<String, String> {
    parse_source(text)
        .map(|parsed| parsed.dump(options.max_dump_depth))
        .map_err(|err| describe_error(&SourceBuffer::new(text), &err))
}

/// Parse a file and print its tree.
pub fn parse_file(path: &str, options: ParseOptions) {
    let content = read_file(path);
    match render_parse(&content, options) {
        Ok(dump) if dump.is_empty() => println!("(empty)"),
        Ok(dump) => print!("{dump}"),
        Err(msg) => {
            eprintln!("{path}: {msg}");
            std::process::exit(1);
        }
    }
}
