//! Operand and operator stacks, and reduction.

use smallvec::SmallVec;
use sprig_ir::{NodeId, NodeTag, Shape};
use sprig_lexer_core::Token;
use tracing::trace;

use super::Parser;
use crate::ParseError;

/// A finished subtree on the operand stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Operand {
    pub(super) node: NodeId,
    /// Came out of parentheses: an enumeration is never extended in place.
    pub(super) grouped: bool,
}

impl Operand {
    pub(super) fn new(node: NodeId) -> Self {
        Operand {
            node,
            grouped: false,
        }
    }
}

/// An operator or scope marker on the operator stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Pending {
    pub(super) tag: NodeTag,
    pub(super) token: Option<Token>,
    /// Operand stack height when this entry was pushed.
    pub(super) base: usize,
}

impl Parser<'_> {
    pub(super) fn push_operator(&mut self, tag: NodeTag, token: Option<Token>) {
        self.operators.push(Pending {
            tag,
            token,
            base: self.operands.len(),
        });
    }

    /// Push a binary operator after reducing everything that binds tighter.
    pub(super) fn binary(
        &mut self,
        tag: NodeTag,
        token: Option<Token>,
        at: Token,
    ) -> Result<(), ParseError> {
        while self
            .operators
            .last()
            .is_some_and(|top| top.tag.reduces_before(tag))
        {
            self.reduce(at)?;
        }
        self.push_operator(tag, token);
        Ok(())
    }

    /// Pop one operator and combine it with its operands.
    pub(super) fn reduce(&mut self, at: Token) -> Result<(), ParseError> {
        let Some(op) = self.operators.pop() else {
            return Err(ParseError::UnexpectedToken(at));
        };
        trace!(tag = op.tag.name(), operands = self.operands.len(), "reduce");
        match op.tag.shape() {
            Shape::Single => {
                let operand = self.pop_operand(at)?;
                self.build(op.tag, op.token, &[operand])
            }
            Shape::Pair => {
                let right = self.pop_operand(at)?;
                let left = self.pop_operand(at)?;
                self.build(op.tag, op.token, &[left, right])
            }
            Shape::List => {
                let right = self.pop_operand(at)?;
                let left = self.pop_operand(at)?;
                if !left.grouped && self.arena.tag(left.node) == op.tag {
                    self.arena.attach(left.node, right.node)?;
                    self.operands.push(Operand::new(left.node));
                    Ok(())
                } else {
                    self.build(op.tag, op.token, &[left, right])
                }
            }
            Shape::Void => Err(ParseError::UnexpectedToken(at)),
        }
    }

    /// Pop the marker `marker` and every operand produced inside its scope.
    pub(super) fn take_frame(
        &mut self,
        marker: NodeTag,
        at: Token,
    ) -> Result<(Pending, SmallVec<[Operand; 2]>), ParseError> {
        match self.operators.last() {
            Some(top) if top.tag == marker && top.base <= self.operands.len() => {}
            _ => return Err(ParseError::UnexpectedToken(at)),
        }
        let Some(pending) = self.operators.pop() else {
            return Err(ParseError::UnexpectedToken(at));
        };
        let inner = self.operands.drain(pending.base..).collect();
        Ok((pending, inner))
    }

    /// Replace the single operand inside `marker`'s scope by a `tag` node
    /// around it.
    pub(super) fn wrap(
        &mut self,
        marker: NodeTag,
        tag: NodeTag,
        at: Token,
    ) -> Result<(), ParseError> {
        let (_, inner) = self.take_frame(marker, at)?;
        if inner.len() != 1 {
            return Err(ParseError::UnexpectedToken(at));
        }
        self.build(tag, None, &inner)
    }

    /// Allocate a `tag` node over `children` and push it as an operand.
    pub(super) fn build(
        &mut self,
        tag: NodeTag,
        token: Option<Token>,
        children: &[Operand],
    ) -> Result<(), ParseError> {
        let id = self.arena.create(tag, token)?;
        for child in children {
            self.arena.attach(id, child.node)?;
        }
        self.operands.push(Operand::new(id));
        Ok(())
    }

    fn pop_operand(&mut self, at: Token) -> Result<Operand, ParseError> {
        self.operands.pop().ok_or(ParseError::UnexpectedToken(at))
    }
}
