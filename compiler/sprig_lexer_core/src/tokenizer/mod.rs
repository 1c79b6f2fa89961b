//! Explicit-state tokenizer.
//!
//! Each call to [`Tokenizer::next_token`] runs the state machine from
//! [`State::Start`] until exactly one token is produced. The machine can also
//! be entered in any other state through [`Tokenizer::next_from`]: the parser
//! uses this to read the first line's indentation, and streaming callers use
//! it to resume a token that was cut off at a chunk boundary
//! (see [`Tokenizer::end_state`]).
//!
//! # Failure encoding
//!
//! The tokenizer never fails. Malformed input becomes an `Invalid` token whose
//! range ends just after the offending byte; input that stops in the middle of
//! a token becomes `Incomplete`.
//!
//! # Numbers
//!
//! ```text
//! number   = "0" [ prefix digit ] digits [ "." digit digits ] [ exponent ]
//!          | nonzero digits [ "." digit digits ] [ exponent ]
//! prefix   = "0b" | "0o" | "0x"
//! exponent = ("e" | "E" | "p" | "P") [ "+" | "-" ] dec_digit dec_digits
//! ```
//!
//! Digit validity per radix comes from [`RADIX_DIGITS`]; `e`/`E` only apply to
//! decimal and `p`/`P` only to hexadecimal.

use bitflags::bitflags;

use crate::{lookup_keyword, Cursor, Location, SourceBuffer, Token, TokenTag};

bitflags! {
    /// Tokenizer configuration.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TokenizerFlags: u8 {
        /// Emit runs of spaces and tabs as `Space` tokens instead of skipping them.
        const EMIT_SPACES = 1 << 0;
        /// After a newline, skip blank lines and emit the next line's
        /// leading spaces as an `Indent` token.
        const TRACK_INDENTATION = 1 << 1;
        /// The buffer is a chunk of a longer stream: a token still able to
        /// grow at the end of the buffer is `Incomplete`, never complete.
        const PARTIAL_INPUT = 1 << 2;
    }
}

impl TokenizerFlags {
    /// Configuration used by the parser.
    pub const PARSER: Self = Self::TRACK_INDENTATION;
}

/// Numeric base of a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Radix {
    Bin = 0,
    Oct = 1,
    Dec = 2,
    Hex = 3,
}

impl Radix {
    /// Numeric value of the base.
    pub fn base(self) -> u32 {
        match self {
            Self::Bin => 2,
            Self::Oct => 8,
            Self::Dec => 10,
            Self::Hex => 16,
        }
    }

    /// Whether `byte` is a digit of this radix.
    #[inline]
    pub fn is_digit(self, byte: u8) -> bool {
        RADIX_DIGITS[self as usize][byte as usize]
    }

    #[inline]
    fn is_exponent_marker(self, byte: u8) -> bool {
        match self {
            Self::Dec => matches!(byte, b'e' | b'E'),
            Self::Hex => matches!(byte, b'p' | b'P'),
            Self::Bin | Self::Oct => false,
        }
    }
}

/// Digit membership, indexed by `[radix as usize][byte]`.
pub static RADIX_DIGITS: [[bool; 256]; 4] = build_radix_digits();

#[allow(
    clippy::cast_possible_truncation,
    reason = "loop index is bounded by 256"
)]
const fn build_radix_digits() -> [[bool; 256]; 4] {
    let mut table = [[false; 256]; 4];
    let mut i = 0;
    while i < 256 {
        let b = i as u8;
        table[Radix::Bin as usize][i] = matches!(b, b'0' | b'1');
        table[Radix::Oct as usize][i] = matches!(b, b'0'..=b'7');
        table[Radix::Dec as usize][i] = b.is_ascii_digit();
        table[Radix::Hex as usize][i] = b.is_ascii_hexdigit();
        i += 1;
    }
    table
}

/// Single-byte symbol for `b`, if any.
const fn symbol_tag(b: u8) -> Option<TokenTag> {
    Some(match b {
        b'(' => TokenTag::LParen,
        b')' => TokenTag::RParen,
        b'[' => TokenTag::LBracket,
        b']' => TokenTag::RBracket,
        b'{' => TokenTag::LBrace,
        b'}' => TokenTag::RBrace,
        b'+' => TokenTag::Plus,
        b'-' => TokenTag::Minus,
        b'*' => TokenTag::Star,
        b'/' => TokenTag::Slash,
        b'^' => TokenTag::Caret,
        b',' => TokenTag::Comma,
        b'|' => TokenTag::Pipe,
        b'.' => TokenTag::Dot,
        b'=' => TokenTag::Equal,
        b':' => TokenTag::Colon,
        b';' => TokenTag::Semicolon,
        _ => return None,
    })
}

static SYMBOLS: [Option<TokenTag>; 256] = build_symbols();

/// Bytes that may directly follow a complete identifier or number.
static DELIMITERS: [bool; 256] = build_delimiters();

#[allow(
    clippy::cast_possible_truncation,
    reason = "loop index is bounded by 256"
)]
const fn build_symbols() -> [Option<TokenTag>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = symbol_tag(i as u8);
        i += 1;
    }
    table
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "loop index is bounded by 256"
)]
const fn build_delimiters() -> [bool; 256] {
    let mut table = [false; 256];
    let mut i = 0;
    while i < 256 {
        let b = i as u8;
        table[i] = matches!(b, b' ' | b'\t' | b'\r' | b'\n')
            || (b != b'.' && symbol_tag(b).is_some());
        i += 1;
    }
    table
}

#[inline]
fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Tokenizer state.
///
/// Every state other than `Start` and `LineStart` is "inside a token".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    Start,
    /// Directly after a newline, measuring indentation.
    LineStart,
    Spaces,
    Identifier,
    /// A leading `0`: base prefix, decimal digits, fraction or exponent may follow.
    Zero,
    /// After `0b`, `0o` or `0x`; one digit is required.
    BasePrefix(Radix),
    Integer(Radix),
    /// After `.`; one digit is required.
    FractionStart(Radix),
    Fraction(Radix),
    /// After the exponent marker.
    ExponentStart,
    /// After the exponent sign.
    ExponentSign,
    Exponent,
    String,
    StringEscape,
    /// After the opening `'`.
    CharOpen,
    CharEscape,
    /// After the character; expects the closing `'`.
    CharClose,
    /// After `(`; may become `()`.
    LParen,
    /// After `+`; may become `++`.
    Plus,
}

/// Pull-based tokenizer over a [`SourceBuffer`].
#[derive(Clone, Debug)]
pub struct Tokenizer<'a> {
    cursor: Cursor<'a>,
    flags: TokenizerFlags,
    end_state: State,
    /// Current 1-based line and the offset where it starts.
    line: u32,
    line_start: u32,
    /// Line and line start at the start of the last token.
    token_line: u32,
    token_line_start: u32,
    last_start: u32,
}

impl<'a> Tokenizer<'a> {
    /// Tokenizer with no flags: spaces and newlines are skipped.
    pub fn new(buf: &'a SourceBuffer) -> Self {
        Self::with_flags(buf, TokenizerFlags::empty())
    }

    pub fn with_flags(buf: &'a SourceBuffer, flags: TokenizerFlags) -> Self {
        Self {
            cursor: buf.cursor(),
            flags,
            end_state: State::Start,
            line: 1,
            line_start: 0,
            token_line: 1,
            token_line_start: 0,
            last_start: 0,
        }
    }

    pub fn flags(&self) -> TokenizerFlags {
        self.flags
    }

    /// Produce the next token.
    ///
    /// Returns `Eof` (with an empty range at the end of the source) once the
    /// input is exhausted, and keeps returning it.
    #[inline]
    pub fn next_token(&mut self) -> Token {
        self.next_from(State::Start)
    }

    /// The token `next_token` would return, without consuming it.
    pub fn peek(&self) -> Token {
        self.clone().next_token()
    }

    /// Run the machine starting in `state` instead of `Start`.
    pub fn next_from(&mut self, state: State) -> Token {
        let start = self.mark();
        let token = self.scan(state, start);
        self.last_start = token.start;
        token
    }

    /// State the machine was in when the input last ran out.
    ///
    /// After an `Incomplete` token from a partial buffer, pass this to
    /// [`next_from`](Self::next_from) on a tokenizer over the next chunk.
    pub fn end_state(&self) -> State {
        self.end_state
    }

    /// 1-based position of the most recently returned token.
    pub fn location(&self) -> Location {
        Location {
            line: self.token_line,
            column: self.last_start - self.token_line_start + 1,
        }
    }

    fn scan(&mut self, mut state: State, mut start: u32) -> Token {
        loop {
            let b = self.cursor.current();
            match state {
                State::Start => match b {
                    0 if self.cursor.is_eof() => return self.eof(State::Start),
                    b' ' | b'\t' if self.flags.contains(TokenizerFlags::EMIT_SPACES) => {
                        state = State::Spaces;
                    }
                    b' ' | b'\t' | b'\r' => {
                        self.cursor.advance();
                        start = self.mark();
                    }
                    b'\n' => {
                        self.bump();
                        start = self.mark();
                        if self.flags.contains(TokenizerFlags::TRACK_INDENTATION) {
                            state = State::LineStart;
                        }
                    }
                    b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                        self.cursor.advance();
                        state = State::Identifier;
                    }
                    b'0' => {
                        self.cursor.advance();
                        state = State::Zero;
                    }
                    b'1'..=b'9' => {
                        self.cursor.advance();
                        state = State::Integer(Radix::Dec);
                    }
                    b'"' => {
                        self.cursor.advance();
                        state = State::String;
                    }
                    b'\'' => {
                        self.cursor.advance();
                        state = State::CharOpen;
                    }
                    b'(' => {
                        self.cursor.advance();
                        state = State::LParen;
                    }
                    b'+' => {
                        self.cursor.advance();
                        state = State::Plus;
                    }
                    _ => {
                        return match SYMBOLS[b as usize] {
                            Some(tag) => {
                                self.cursor.advance();
                                self.token(tag, start)
                            }
                            None => self.invalid(start),
                        };
                    }
                },

                State::LineStart => match b {
                    b' ' => self.cursor.advance(),
                    b'\n' => {
                        self.bump();
                        start = self.mark();
                    }
                    b'\r' if self.cursor.peek() == b'\n' => {
                        self.cursor.advance();
                        self.bump();
                        start = self.mark();
                    }
                    b'\t' => return self.invalid(start),
                    0 if self.cursor.is_eof() => {
                        if self.partial() && self.cursor.pos() > start {
                            return self.incomplete(state, start);
                        }
                        return self.eof(state);
                    }
                    _ => return self.token(TokenTag::Indent, start),
                },

                State::Spaces => {
                    self.cursor.eat_while(|c| c == b' ' || c == b'\t');
                    if self.cursor.is_eof() && self.partial() {
                        return self.incomplete(state, start);
                    }
                    return self.token(TokenTag::Space, start);
                }

                State::Identifier => {
                    self.cursor.eat_while(is_ident_continue);
                    let text = self.cursor.slice(start, self.cursor.pos());
                    let tag = lookup_keyword(text).unwrap_or(TokenTag::Identifier);
                    return self.accept(state, start, tag);
                }

                State::Zero => match b {
                    b'b' => self.shift(&mut state, State::BasePrefix(Radix::Bin)),
                    b'o' => self.shift(&mut state, State::BasePrefix(Radix::Oct)),
                    b'x' => self.shift(&mut state, State::BasePrefix(Radix::Hex)),
                    b'0'..=b'9' => self.shift(&mut state, State::Integer(Radix::Dec)),
                    b'.' => self.shift(&mut state, State::FractionStart(Radix::Dec)),
                    b'e' | b'E' => self.shift(&mut state, State::ExponentStart),
                    _ => return self.accept(state, start, TokenTag::Number),
                },

                State::BasePrefix(radix) => {
                    if !radix.is_digit(b) {
                        return self.reject(state, start);
                    }
                    self.shift(&mut state, State::Integer(radix));
                }

                State::Integer(radix) => {
                    self.cursor.eat_while(|c| radix.is_digit(c));
                    let c = self.cursor.current();
                    if c == b'.' {
                        self.shift(&mut state, State::FractionStart(radix));
                    } else if radix.is_exponent_marker(c) {
                        self.shift(&mut state, State::ExponentStart);
                    } else {
                        return self.accept(state, start, TokenTag::Number);
                    }
                }

                State::FractionStart(radix) => {
                    if !radix.is_digit(b) {
                        return self.reject(state, start);
                    }
                    self.shift(&mut state, State::Fraction(radix));
                }

                State::Fraction(radix) => {
                    self.cursor.eat_while(|c| radix.is_digit(c));
                    if radix.is_exponent_marker(self.cursor.current()) {
                        self.shift(&mut state, State::ExponentStart);
                    } else {
                        return self.accept(state, start, TokenTag::Number);
                    }
                }

                State::ExponentStart => match b {
                    b'+' | b'-' => self.shift(&mut state, State::ExponentSign),
                    b'0'..=b'9' => self.shift(&mut state, State::Exponent),
                    _ => return self.reject(state, start),
                },

                State::ExponentSign => match b {
                    b'0'..=b'9' => self.shift(&mut state, State::Exponent),
                    _ => return self.reject(state, start),
                },

                State::Exponent => {
                    self.cursor.eat_while(|c| c.is_ascii_digit());
                    return self.accept(state, start, TokenTag::Number);
                }

                State::String => match b {
                    b'"' => {
                        self.cursor.advance();
                        return self.token(TokenTag::String, start);
                    }
                    b'\\' => self.shift(&mut state, State::StringEscape),
                    b'\t' | 0x20..=0x7E | 0x80..=0xFF => self.cursor.advance(),
                    _ => return self.reject(state, start),
                },

                State::StringEscape => match b {
                    0x20..=0x7E => self.shift(&mut state, State::String),
                    _ => return self.reject(state, start),
                },

                State::CharOpen => match b {
                    b'\\' => self.shift(&mut state, State::CharEscape),
                    b'\'' => return self.invalid(start),
                    0x20..=0x7E => self.shift(&mut state, State::CharClose),
                    _ => return self.reject(state, start),
                },

                State::CharEscape => match b {
                    b'n' | b'r' | b't' | b'\'' => self.shift(&mut state, State::CharClose),
                    _ => return self.reject(state, start),
                },

                State::CharClose => match b {
                    b'\'' => {
                        self.cursor.advance();
                        return self.token(TokenTag::Char, start);
                    }
                    _ => return self.reject(state, start),
                },

                State::LParen => {
                    return self.compound(state, start, b')', TokenTag::LParen, TokenTag::EmptyParens);
                }

                State::Plus => {
                    return self.compound(state, start, b'+', TokenTag::Plus, TokenTag::PlusPlus);
                }
            }
        }
    }

    /// Consume the current byte and move to `next`.
    #[inline]
    fn shift(&mut self, state: &mut State, next: State) {
        self.cursor.advance();
        *state = next;
    }

    /// Consume one byte, keeping the line counters current.
    #[inline]
    fn bump(&mut self) {
        let newline = self.cursor.current() == b'\n';
        self.cursor.advance();
        if newline {
            self.line += 1;
            self.line_start = self.cursor.pos();
        }
    }

    /// Begin a token at the current position.
    #[inline]
    fn mark(&mut self) -> u32 {
        self.token_line = self.line;
        self.token_line_start = self.line_start;
        self.cursor.pos()
    }

    #[inline]
    fn partial(&self) -> bool {
        self.flags.contains(TokenizerFlags::PARTIAL_INPUT)
    }

    #[inline]
    fn token(&self, tag: TokenTag, start: u32) -> Token {
        Token {
            tag,
            start,
            end: self.cursor.pos(),
        }
    }

    fn eof(&mut self, state: State) -> Token {
        self.end_state = state;
        let pos = self.cursor.pos();
        Token {
            tag: TokenTag::Eof,
            start: pos,
            end: pos,
        }
    }

    fn incomplete(&mut self, state: State, start: u32) -> Token {
        self.end_state = state;
        self.token(TokenTag::Incomplete, start)
    }

    /// Consume the offending byte into an `Invalid` token.
    fn invalid(&mut self, start: u32) -> Token {
        self.bump();
        self.token(TokenTag::Invalid, start)
    }

    /// Finish a token in an accepting state.
    fn accept(&mut self, state: State, start: u32, tag: TokenTag) -> Token {
        if self.cursor.is_eof() {
            if self.partial() {
                return self.incomplete(state, start);
            }
            return self.token(tag, start);
        }
        if DELIMITERS[self.cursor.current() as usize] {
            self.token(tag, start)
        } else {
            self.invalid(start)
        }
    }

    /// Finish a token in a state that still needs more input.
    fn reject(&mut self, state: State, start: u32) -> Token {
        if self.cursor.is_eof() {
            self.incomplete(state, start)
        } else {
            self.invalid(start)
        }
    }

    /// One-byte lookahead for two-byte symbols.
    fn compound(
        &mut self,
        state: State,
        start: u32,
        second: u8,
        single: TokenTag,
        double: TokenTag,
    ) -> Token {
        if self.cursor.current() == second {
            self.cursor.advance();
            return self.token(double, start);
        }
        if self.cursor.is_eof() && self.partial() {
            return self.incomplete(state, start);
        }
        self.token(single, start)
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    /// Yields tokens up to, not including, `Eof`.
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.tag != TokenTag::Eof).then_some(token)
    }
}

/// Collect every token of `buf` with the default configuration.
pub fn tokenize(buf: &SourceBuffer) -> Vec<Token> {
    Tokenizer::new(buf).collect()
}

#[cfg(test)]
mod tests;
