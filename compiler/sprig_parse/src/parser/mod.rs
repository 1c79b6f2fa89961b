//! The parser state machine.
//!
//! One loop reads a token, dispatches on `(state, token.tag)` and either
//! consumes the token or re-dispatches it in a different state. Three stacks
//! carry everything else:
//!
//! - **operands**: finished subtrees;
//! - **operators**: pending operators, plus precedence-0 *markers* (`group`,
//!   `attrs`, `value`, `block_assign`, `name_def`, control tags) that open a
//!   scope no reduction crosses;
//! - **continuations**: the state to resume when the innermost scope ends.
//!
//! A scope ends when the operator state meets a token it cannot continue
//! with (a dedent, `)`, `]`, end of input). The parser then *finishes the
//! frame*: it reduces down to the innermost marker, pops a continuation and
//! hands it the same token.
//!
//! Indentation is handled as an operator. A line at the current level, in a
//! scope that holds blocks, joins the previous one through `block_and`
//! (or `block_or` if it starts with `|`).

mod stacks;

use sprig_ir::{NodeArena, NodeId, NodeTag};
use sprig_lexer_core::{
    SourceBuffer, State as LexState, Token, TokenTag, Tokenizer, TokenizerFlags,
};
use tracing::{debug, trace};

use crate::indent::IndentState;
use crate::ParseError;
use stacks::{Operand, Pending};

/// Parser state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Expecting an operand or a prefix construct.
    Expr,
    /// After an operand: expecting an operator, a line break or a scope end.
    Operator,
    /// After `(`: an indent here opens a block group.
    ParenPostOpen,
    /// Waiting for `)`. `outer_level` is the level to restore; `block` means
    /// the group was opened with an indented body.
    ParenCloseEnd { outer_level: u32, block: bool },
    /// After `.`.
    NamePostDot,
    /// After `.ident` (and after its attributes once `attrs` is set).
    NamePostDotId { attrs: bool },
    /// Waiting for `]` closing an attribute list.
    NameAttrsEnd,
    /// End of an inline `= value`.
    NameAssignEnd,
    /// End of a block-assigned body.
    NameBlockAssignEnd { outer_level: u32 },
    /// End of a control header; the body must follow one level deeper.
    ControlHeaderEnd,
    /// End of a control body.
    ControlBlockEnd { outer_level: u32 },
    /// Root scope.
    End,
}

/// What the loop does after a dispatch.
enum Step {
    /// The token was used; read the next one.
    Consume(State),
    /// Dispatch the same token again.
    Redo(State),
    Done(NodeId),
}

pub(crate) struct Parser<'a> {
    tokens: Tokenizer<'a>,
    arena: &'a mut NodeArena,
    operands: Vec<Operand>,
    operators: Vec<Pending>,
    continuations: Vec<State>,
    indent: IndentState,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(arena: &'a mut NodeArena, source: &'a SourceBuffer) -> Self {
        Parser {
            tokens: Tokenizer::with_flags(source, TokenizerFlags::PARSER),
            arena,
            operands: Vec::new(),
            operators: Vec::new(),
            continuations: Vec::new(),
            indent: IndentState::new(0),
        }
    }

    pub(crate) fn run(mut self) -> Result<Option<NodeId>, ParseError> {
        let first = self.tokens.next_from(LexState::LineStart);
        match first.tag {
            TokenTag::Eof => return Ok(None),
            TokenTag::Indent => self.indent = IndentState::new(first.len()),
            _ => return Err(ParseError::UnexpectedToken(first)),
        }
        debug!(trim = first.len(), "first line");

        self.continuations.push(State::End);
        let mut state = State::Expr;
        let mut token = self.tokens.next_token();
        loop {
            trace!(
                ?state,
                token = token.tag.name(),
                start = token.start,
                operands = self.operands.len(),
                operators = self.operators.len(),
                "dispatch"
            );
            let step = match state {
                State::Expr => self.expr(token)?,
                State::Operator => self.operator(token)?,
                State::ParenPostOpen => self.paren_post_open(token)?,
                State::ParenCloseEnd { outer_level, block } => {
                    self.paren_close_end(token, outer_level, block)?
                }
                State::NamePostDot => self.name_post_dot(token)?,
                State::NamePostDotId { attrs } => self.name_post_dot_id(token, attrs)?,
                State::NameAttrsEnd => self.name_attrs_end(token)?,
                State::NameAssignEnd => self.name_assign_end(token)?,
                State::NameBlockAssignEnd { outer_level } => {
                    self.name_block_assign_end(token, outer_level)?
                }
                State::ControlHeaderEnd => self.control_header_end(token)?,
                State::ControlBlockEnd { outer_level } => {
                    self.control_block_end(token, outer_level)?
                }
                State::End => self.end(token)?,
            };
            match step {
                Step::Consume(next) => {
                    state = next;
                    token = self.tokens.next_token();
                }
                Step::Redo(next) => state = next,
                Step::Done(root) => {
                    debug!(unit = ?self.indent.unit(), "indentation");
                    return Ok(Some(root));
                }
            }
        }
    }

    // === Hub states ===

    fn expr(&mut self, token: Token) -> Result<Step, ParseError> {
        let leaf = match token.tag {
            TokenTag::Number => NodeTag::Number,
            TokenTag::String => NodeTag::String,
            TokenTag::Char => NodeTag::Char,
            TokenTag::Identifier => NodeTag::Identifier,
            TokenTag::Minus => {
                self.push_operator(NodeTag::Negate, Some(token));
                return Ok(Step::Consume(State::Expr));
            }
            TokenTag::LParen => {
                self.push_operator(NodeTag::Group, Some(token));
                return Ok(Step::Consume(State::ParenPostOpen));
            }
            TokenTag::Dot => return Ok(Step::Consume(State::NamePostDot)),
            TokenTag::KwIf | TokenTag::KwElif | TokenTag::KwFor | TokenTag::KwWhile => {
                let tag = match token.tag {
                    TokenTag::KwIf => NodeTag::If,
                    TokenTag::KwElif => NodeTag::Elif,
                    TokenTag::KwFor => NodeTag::For,
                    _ => NodeTag::While,
                };
                self.push_operator(tag, Some(token));
                self.continuations.push(State::ControlHeaderEnd);
                return Ok(Step::Consume(State::Expr));
            }
            TokenTag::KwElse => {
                self.push_operator(NodeTag::Else, Some(token));
                return Ok(Step::Consume(State::ControlHeaderEnd));
            }
            _ => return Err(self.unexpected(token)),
        };
        let id = self.arena.create(leaf, Some(token))?;
        self.operands.push(Operand::new(id));
        Ok(Step::Consume(State::Operator))
    }

    fn operator(&mut self, token: Token) -> Result<Step, ParseError> {
        let tag = match token.tag {
            TokenTag::Plus => NodeTag::Add,
            TokenTag::Minus => NodeTag::Sub,
            TokenTag::PlusPlus => NodeTag::Concat,
            TokenTag::Star => NodeTag::Mul,
            TokenTag::Slash => NodeTag::Div,
            TokenTag::Caret => NodeTag::Pow,
            TokenTag::Comma => NodeTag::EnumAnd,
            TokenTag::Pipe => NodeTag::EnumOr,
            TokenTag::Equal if self.innermost_marker() == Some(NodeTag::Attrs) => {
                NodeTag::Assign
            }
            TokenTag::Indent => return self.operator_indent(token),
            TokenTag::RParen | TokenTag::RBracket | TokenTag::Eof => {
                return self.finish_frame(token);
            }
            _ => return Err(self.unexpected(token)),
        };
        self.binary(tag, Some(token), token)?;
        Ok(Step::Consume(State::Expr))
    }

    fn operator_indent(&mut self, token: Token) -> Result<Step, ParseError> {
        let level = self.indent.measure(token)?;
        if level == self.indent.level && self.frame_holds_blocks() {
            let tag = if self.tokens.peek().tag == TokenTag::Pipe {
                self.tokens.next_token();
                NodeTag::BlockOr
            } else {
                NodeTag::BlockAnd
            };
            self.binary(tag, None, token)?;
            return Ok(Step::Consume(State::Expr));
        }
        self.finish_frame(token)
    }

    fn end(&mut self, token: Token) -> Result<Step, ParseError> {
        match token.tag {
            TokenTag::Eof if self.operators.is_empty() && self.operands.len() == 1 => {
                let root = self.operands[0].node;
                Ok(Step::Done(root))
            }
            TokenTag::RParen | TokenTag::RBracket => Err(ParseError::UnmatchedBracket(token)),
            _ => Err(self.unexpected(token)),
        }
    }

    // === Groups ===

    fn paren_post_open(&mut self, token: Token) -> Result<Step, ParseError> {
        let outer_level = self.indent.level;
        if token.tag == TokenTag::Indent {
            let level = self.indent.measure(token)?;
            self.open_block(token, level)?;
            self.continuations.push(State::ParenCloseEnd {
                outer_level,
                block: true,
            });
            return Ok(Step::Consume(State::Expr));
        }
        self.continuations.push(State::ParenCloseEnd {
            outer_level,
            block: false,
        });
        Ok(Step::Redo(State::Expr))
    }

    fn paren_close_end(
        &mut self,
        token: Token,
        outer_level: u32,
        block: bool,
    ) -> Result<Step, ParseError> {
        match token.tag {
            TokenTag::RParen => {
                self.indent.level = outer_level;
                let (_, inner) = self.take_frame(NodeTag::Group, token)?;
                let [operand] = inner.as_slice() else {
                    return Err(ParseError::UnexpectedToken(token));
                };
                self.operands.push(Operand {
                    grouped: true,
                    ..*operand
                });
                Ok(Step::Consume(State::Operator))
            }
            TokenTag::Indent if block => {
                let level = self.indent.measure(token)?;
                if level < outer_level {
                    return Err(ParseError::UnalignedIndent(token));
                }
                if level > outer_level {
                    return Err(ParseError::UnexpectedToken(token));
                }
                let next = self.tokens.peek();
                if next.tag != TokenTag::RParen {
                    return Err(ParseError::UnexpectedToken(next));
                }
                self.indent.level = outer_level;
                Ok(Step::Consume(State::ParenCloseEnd {
                    outer_level,
                    block: false,
                }))
            }
            TokenTag::RBracket => Err(ParseError::UnmatchedBracket(token)),
            _ => Err(self.unexpected(token)),
        }
    }

    // === Name definitions ===

    fn name_post_dot(&mut self, token: Token) -> Result<Step, ParseError> {
        if token.tag != TokenTag::Identifier {
            return Err(self.unexpected(token));
        }
        self.push_operator(NodeTag::NameDef, Some(token));
        Ok(Step::Consume(State::NamePostDotId { attrs: false }))
    }

    fn name_post_dot_id(&mut self, token: Token, attrs: bool) -> Result<Step, ParseError> {
        match token.tag {
            TokenTag::LBracket if !attrs => {
                if self.tokens.peek().tag == TokenTag::RBracket {
                    self.tokens.next_token();
                    let id = self.arena.create(NodeTag::Attrs, None)?;
                    self.operands.push(Operand::new(id));
                    return Ok(Step::Consume(State::NamePostDotId { attrs: true }));
                }
                self.push_operator(NodeTag::Attrs, None);
                self.continuations.push(State::NameAttrsEnd);
                Ok(Step::Consume(State::Expr))
            }
            TokenTag::Equal => {
                self.push_operator(NodeTag::Value, None);
                self.continuations.push(State::NameAssignEnd);
                Ok(Step::Consume(State::Expr))
            }
            TokenTag::Indent => {
                let level = self.indent.measure(token)?;
                if level <= self.indent.level {
                    self.finish_name(token)?;
                    return Ok(Step::Redo(State::Operator));
                }
                let outer_level = self.indent.level;
                self.open_block(token, level)?;
                self.push_operator(NodeTag::BlockAssign, None);
                self.continuations
                    .push(State::NameBlockAssignEnd { outer_level });
                Ok(Step::Consume(State::Expr))
            }
            _ => {
                self.finish_name(token)?;
                Ok(Step::Redo(State::Operator))
            }
        }
    }

    fn name_attrs_end(&mut self, token: Token) -> Result<Step, ParseError> {
        match token.tag {
            TokenTag::RBracket => {
                self.wrap(NodeTag::Attrs, NodeTag::Attrs, token)?;
                Ok(Step::Consume(State::NamePostDotId { attrs: true }))
            }
            TokenTag::RParen => Err(ParseError::UnmatchedBracket(token)),
            _ => Err(self.unexpected(token)),
        }
    }

    fn name_assign_end(&mut self, token: Token) -> Result<Step, ParseError> {
        self.wrap(NodeTag::Value, NodeTag::Value, token)?;
        self.finish_name(token)?;
        Ok(Step::Redo(State::Operator))
    }

    fn name_block_assign_end(
        &mut self,
        token: Token,
        outer_level: u32,
    ) -> Result<Step, ParseError> {
        self.check_dedent(token, outer_level)?;
        self.wrap(NodeTag::BlockAssign, NodeTag::Value, token)?;
        self.finish_name(token)?;
        self.indent.level = outer_level;
        Ok(Step::Redo(State::Operator))
    }

    /// Pop the `name_def` marker and build the node from its attrs and value.
    fn finish_name(&mut self, at: Token) -> Result<(), ParseError> {
        let (marker, children) = self.take_frame(NodeTag::NameDef, at)?;
        self.build(NodeTag::NameDef, marker.token, &children)
    }

    // === Control constructs ===

    fn control_header_end(&mut self, token: Token) -> Result<Step, ParseError> {
        if token.tag == TokenTag::Indent {
            let level = self.indent.measure(token)?;
            if level > self.indent.level {
                let outer_level = self.indent.level;
                self.open_block(token, level)?;
                self.continuations
                    .push(State::ControlBlockEnd { outer_level });
                return Ok(Step::Consume(State::Expr));
            }
        }
        Err(self.unexpected(token))
    }

    fn control_block_end(&mut self, token: Token, outer_level: u32) -> Result<Step, ParseError> {
        self.check_dedent(token, outer_level)?;
        let Some(tag) = self.innermost_marker() else {
            return Err(ParseError::UnexpectedToken(token));
        };
        let (marker, children) = self.take_frame(tag, token)?;
        self.build(tag, marker.token, &children)?;
        self.indent.level = outer_level;
        Ok(Step::Redo(State::Operator))
    }

    // === Scopes ===

    /// Enter a block at `level`, which must be exactly one deeper.
    fn open_block(&mut self, token: Token, level: u32) -> Result<(), ParseError> {
        let expected = self.indent.level + 1;
        if level == expected {
            self.indent.level = level;
            Ok(())
        } else if level > expected {
            Err(ParseError::UnalignedIndent(token))
        } else {
            Err(ParseError::UnexpectedToken(token))
        }
    }

    /// A body closed by `token` may only return to `outer_level`.
    fn check_dedent(&mut self, token: Token, outer_level: u32) -> Result<(), ParseError> {
        if token.tag != TokenTag::Indent {
            return Ok(());
        }
        let level = self.indent.measure(token)?;
        if level < outer_level {
            Err(ParseError::UnalignedIndent(token))
        } else if level > outer_level {
            Err(ParseError::UnexpectedToken(token))
        } else {
            Ok(())
        }
    }

    /// Reduce to the innermost marker and resume the enclosing construct.
    fn finish_frame(&mut self, token: Token) -> Result<Step, ParseError> {
        while self
            .operators
            .last()
            .is_some_and(|top| !top.tag.is_marker())
        {
            self.reduce(token)?;
        }
        match self.continuations.pop() {
            Some(next) => Ok(Step::Redo(next)),
            None => Err(ParseError::UnexpectedToken(token)),
        }
    }

    /// Whether a same-level line continues the current scope as a block.
    fn frame_holds_blocks(&self) -> bool {
        matches!(
            self.continuations.last(),
            Some(
                State::End
                    | State::NameBlockAssignEnd { .. }
                    | State::ControlBlockEnd { .. }
                    | State::ParenCloseEnd { block: true, .. }
            )
        )
    }

    fn innermost_marker(&self) -> Option<NodeTag> {
        self.operators
            .iter()
            .rev()
            .find(|op| op.tag.is_marker())
            .map(|op| op.tag)
    }

    /// Error for a token no state accepts, preferring alignment errors.
    fn unexpected(&mut self, token: Token) -> ParseError {
        if token.tag == TokenTag::Indent {
            if let Err(err) = self.indent.measure(token) {
                return err;
            }
        }
        ParseError::UnexpectedToken(token)
    }
}
