//! Indentation bookkeeping.
//!
//! The first non-blank line fixes the *trim*: its width is level 0, so a file
//! indented as a whole still starts at the root. The first line indented past
//! the trim fixes the *unit*. From then on every width must be
//! `trim + k * unit`.

use sprig_lexer_core::Token;

use crate::ParseError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct IndentState {
    trim: u32,
    unit: Option<u32>,
    /// Nesting level of the innermost open block.
    pub(crate) level: u32,
}

impl IndentState {
    pub(crate) fn new(trim: u32) -> Self {
        IndentState {
            trim,
            unit: None,
            level: 0,
        }
    }

    /// Level of an `Indent` token, fixing the unit on the first deeper line.
    pub(crate) fn measure(&mut self, token: Token) -> Result<u32, ParseError> {
        let width = token.len();
        if width < self.trim {
            return Err(ParseError::UnalignedIndent(token));
        }
        let depth = width - self.trim;
        if depth == 0 {
            return Ok(0);
        }
        match self.unit {
            None => {
                self.unit = Some(depth);
                Ok(1)
            }
            Some(unit) if depth % unit == 0 => Ok(depth / unit),
            Some(_) => Err(ParseError::UnalignedIndent(token)),
        }
    }

    pub(crate) fn unit(&self) -> Option<u32> {
        self.unit
    }
}
