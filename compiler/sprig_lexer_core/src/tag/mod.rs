//! Token tags and the `Token` value type.

/// Kind of a token, with semantic range layout.
///
/// | Range   | Category                  |
/// |---------|---------------------------|
/// | 0-9     | Literals & names          |
/// | 16-20   | Keywords                  |
/// | 32-50   | Symbols                   |
/// | 64-65   | Layout (indent, space)    |
/// | 240-241 | Errors                    |
/// | 255     | Eof                       |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenTag {
    // === Literals & names (0-9) ===
    Identifier = 0,
    Number = 1,
    String = 2,
    Char = 3,

    // === Keywords (16-20) ===
    KwIf = 16,
    KwElif = 17,
    KwElse = 18,
    KwFor = 19,
    KwWhile = 20,

    // === Symbols (32-50) ===
    /// `(`
    LParen = 32,
    /// `)`
    RParen = 33,
    /// `()`
    EmptyParens = 34,
    /// `[`
    LBracket = 35,
    /// `]`
    RBracket = 36,
    /// `{`
    LBrace = 37,
    /// `}`
    RBrace = 38,
    /// `+`
    Plus = 39,
    /// `++`
    PlusPlus = 40,
    /// `-`
    Minus = 41,
    /// `*`
    Star = 42,
    /// `/`
    Slash = 43,
    /// `^`
    Caret = 44,
    /// `,`
    Comma = 45,
    /// `|`
    Pipe = 46,
    /// `.`
    Dot = 47,
    /// `=`
    Equal = 48,
    /// `:`
    Colon = 49,
    /// `;`
    Semicolon = 50,

    // === Layout (64-65) ===
    /// Leading spaces of a line; the length is the indentation width.
    Indent = 64,
    /// A run of inline spaces (only emitted on request).
    Space = 65,

    // === Errors (240-241) ===
    /// Malformed input; the range includes the offending byte.
    Invalid = 240,
    /// Valid so far, but the buffer ended before the token closed.
    Incomplete = 241,

    // === Control ===
    Eof = 255,
}

impl TokenTag {
    /// Fixed spelling of the tag, if it has one.
    pub fn lexeme(self) -> Option<&'static str> {
        Some(match self {
            Self::KwIf => "if",
            Self::KwElif => "elif",
            Self::KwElse => "else",
            Self::KwFor => "for",
            Self::KwWhile => "while",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::EmptyParens => "()",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Plus => "+",
            Self::PlusPlus => "++",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Caret => "^",
            Self::Comma => ",",
            Self::Pipe => "|",
            Self::Dot => ".",
            Self::Equal => "=",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Identifier
            | Self::Number
            | Self::String
            | Self::Char
            | Self::Indent
            | Self::Space
            | Self::Invalid
            | Self::Incomplete
            | Self::Eof => return None,
        })
    }

    /// Name used in diagnostics and token dumps.
    pub fn name(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Number => "number",
            Self::String => "string",
            Self::Char => "char",
            Self::KwIf => "if",
            Self::KwElif => "elif",
            Self::KwElse => "else",
            Self::KwFor => "for",
            Self::KwWhile => "while",
            Self::LParen => "l_paren",
            Self::RParen => "r_paren",
            Self::EmptyParens => "empty_parens",
            Self::LBracket => "l_bracket",
            Self::RBracket => "r_bracket",
            Self::LBrace => "l_brace",
            Self::RBrace => "r_brace",
            Self::Plus => "plus",
            Self::PlusPlus => "plus_plus",
            Self::Minus => "minus",
            Self::Star => "star",
            Self::Slash => "slash",
            Self::Caret => "caret",
            Self::Comma => "comma",
            Self::Pipe => "pipe",
            Self::Dot => "dot",
            Self::Equal => "equal",
            Self::Colon => "colon",
            Self::Semicolon => "semicolon",
            Self::Indent => "indent",
            Self::Space => "space",
            Self::Invalid => "invalid",
            Self::Incomplete => "incomplete",
            Self::Eof => "eof",
        }
    }

    /// `true` for `Invalid` and `Incomplete`.
    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Self::Invalid | Self::Incomplete)
    }

    /// `true` for the keyword tags.
    #[inline]
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::KwIf | Self::KwElif | Self::KwElse | Self::KwFor | Self::KwWhile
        )
    }
}

/// A token: a tag plus a half-open byte range into the source buffer.
///
/// Tokens own no text; use [`SourceBuffer::text`](crate::SourceBuffer::text)
/// to re-slice it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub tag: TokenTag,
    pub start: u32,
    pub end: u32,
}

impl Token {
    /// Byte length of the token.
    #[inline]
    pub fn len(self) -> u32 {
        self.end - self.start
    }

    /// `true` for zero-length tokens (`Eof`, empty `Indent`).
    #[inline]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// Token should pack into 12 bytes (tag + two offsets, padded).
const _: () = assert!(std::mem::size_of::<Token>() <= 12);
