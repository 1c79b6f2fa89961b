//! Syntax tree for sprig.
//!
//! Nodes live in a [`NodeArena`] owned by whoever called the parser and are
//! addressed by [`NodeId`]. The arena is freed in one step; there is no
//! per-node lifetime.
//!
//! A node's payload shape (no children, one, two, or a list) is fixed by its
//! [`NodeTag`] through a static table, so tree walks treat every node the same
//! way through [`NodeArena::children`].

mod arena;
mod dump;
mod node;
mod tag;

pub use arena::{AllocError, NodeArena};
pub use dump::DEFAULT_MAX_DEPTH;
pub use node::{Node, NodeId, Payload};
pub use tag::{NodeTag, Shape};
