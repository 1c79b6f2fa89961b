//! Parse errors.
//!
//! Every error is fatal: the parser stops at the first one and leaves the
//! arena holding whatever nodes it had built. Token-carrying variants keep the
//! offending token so callers can locate it with
//! [`SourceBuffer::location`](sprig_lexer_core::SourceBuffer::location).

use sprig_ir::AllocError;
use sprig_lexer_core::Token;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Indentation is not `trim + k * unit` wide, or a block closed more
    /// than one level at once, or a body is more than one level deeper.
    #[error("unaligned indentation at byte {}", .0.start)]
    UnalignedIndent(Token),

    #[error("unexpected {} at byte {}", .0.tag.name(), .0.start)]
    UnexpectedToken(Token),

    /// A closing bracket with no open scope of its kind.
    #[error("unmatched {} at byte {}", .0.tag.name(), .0.start)]
    UnmatchedBracket(Token),

    #[error(transparent)]
    OutOfMemory(#[from] AllocError),
}

impl ParseError {
    /// The token the parser stopped at, if the error has one.
    pub fn token(&self) -> Option<Token> {
        match self {
            Self::UnalignedIndent(token)
            | Self::UnexpectedToken(token)
            | Self::UnmatchedBracket(token) => Some(*token),
            Self::OutOfMemory(_) => None,
        }
    }

    /// Short machine-friendly name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnalignedIndent(_) => "unaligned-indent",
            Self::UnexpectedToken(_) => "unexpected-token",
            Self::UnmatchedBracket(_) => "unmatched-bracket",
            Self::OutOfMemory(_) => "out-of-memory",
        }
    }
}
