//! Low-level tokenizer for the sprig markup language.
//!
//! This crate turns a sentinel-terminated [`SourceBuffer`] into a pull-based
//! stream of [`Token`]s. It has no knowledge of the parser: every outcome,
//! including malformed input, is encoded as a token tag (`Invalid`,
//! `Incomplete`, `Eof`) rather than an error value.
//!
//! # Layers
//!
//! - [`SourceBuffer`]: owned copy of the source with a `0x00` sentinel and
//!   zero padding, so the scanner never bounds-checks at EOF.
//! - [`Cursor`]: `Copy` byte cursor over that buffer.
//! - [`Tokenizer`]: explicit finite-state machine producing one token per call.

mod cursor;
mod keywords;
mod source_buffer;
mod tag;
mod tokenizer;

pub use cursor::Cursor;
pub use keywords::lookup_keyword;
pub use source_buffer::{Location, SourceBuffer};
pub use tag::{Token, TokenTag};
pub use tokenizer::{tokenize, Radix, State, Tokenizer, TokenizerFlags};
