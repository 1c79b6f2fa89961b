//! Node ids, nodes and payloads.

use std::fmt;

use smallvec::SmallVec;
use sprig_lexer_core::Token;

use crate::{NodeTag, Shape};

/// Index into a [`NodeArena`](crate::NodeArena).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Placeholder for a child slot that has not been filled yet.
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

/// Children of a node. The variant always matches `tag.shape()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Void,
    Single(NodeId),
    Pair([NodeId; 2]),
    List(SmallVec<[NodeId; 4]>),
}

impl Payload {
    /// Empty payload for `shape`; unfilled slots hold [`NodeId::INVALID`].
    pub fn empty(shape: Shape) -> Self {
        match shape {
            Shape::Void => Payload::Void,
            Shape::Single => Payload::Single(NodeId::INVALID),
            Shape::Pair => Payload::Pair([NodeId::INVALID; 2]),
            Shape::List => Payload::List(SmallVec::new()),
        }
    }
}

/// A syntax tree node.
///
/// Leaves, name definitions and control constructs carry the token they
/// were built from; operators carry their operator token. The two block
/// enumerations and the `attrs`/`value` wrappers carry none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub tag: NodeTag,
    pub token: Option<Token>,
    pub(crate) payload: Payload,
}

impl Node {
    #[inline]
    pub fn shape(&self) -> Shape {
        self.tag.shape()
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Filled child slots, in order.
    pub fn children(&self) -> &[NodeId] {
        match &self.payload {
            Payload::Void => &[],
            Payload::Single(child) => filled(std::slice::from_ref(child)),
            Payload::Pair(pair) => filled(pair),
            Payload::List(list) => list.as_slice(),
        }
    }
}

/// Prefix of `slots` up to the first unfilled one.
fn filled(slots: &[NodeId]) -> &[NodeId] {
    let len = slots.iter().take_while(|id| id.is_valid()).count();
    &slots[..len]
}
