//! Node arena.

use sprig_lexer_core::{SourceBuffer, Token};

use crate::{Node, NodeId, NodeTag, Payload};

/// The arena could not grow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("out of memory while allocating syntax tree nodes")]
pub struct AllocError;

/// Owns every node of one parse.
///
/// Nodes are never freed individually; dropping (or [`clear`](Self::clear)ing)
/// the arena releases the whole tree.
#[derive(Clone, Debug)]
pub struct NodeArena {
    nodes: Vec<Node>,
    /// Maximum number of nodes; creation past it fails with [`AllocError`].
    limit: u32,
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeArena {
    /// Largest possible arena: every id but [`NodeId::INVALID`].
    const MAX_NODES: u32 = u32::MAX - 1;

    pub fn new() -> Self {
        Self::with_limit(Self::MAX_NODES)
    }

    /// Arena that refuses to hold more than `limit` nodes.
    pub fn with_limit(limit: u32) -> Self {
        NodeArena {
            nodes: Vec::new(),
            limit: limit.min(Self::MAX_NODES),
        }
    }

    /// Allocate a node whose payload shape follows `tag`, with no children yet.
    pub fn create(&mut self, tag: NodeTag, token: Option<Token>) -> Result<NodeId, AllocError> {
        let index = u32::try_from(self.nodes.len()).map_err(|_| AllocError)?;
        if index >= self.limit {
            return Err(AllocError);
        }
        self.nodes.try_reserve(1).map_err(|_| AllocError)?;
        self.nodes.push(Node {
            tag,
            token,
            payload: Payload::empty(tag.shape()),
        });
        Ok(NodeId::new(index))
    }

    /// Fill the next child slot of `parent`.
    ///
    /// `Single` and `Pair` nodes take children in order until full; `List`
    /// nodes grow. Attaching to a `Void` node or to a full slot is a bug in
    /// the caller and is ignored in release builds.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), AllocError> {
        let node = &mut self.nodes[parent.index()];
        let tag = node.tag;
        match &mut node.payload {
            Payload::Void => debug_assert!(false, "{tag:?} node takes no children"),
            Payload::Single(slot) => {
                debug_assert!(!slot.is_valid(), "{tag:?} child already set");
                *slot = child;
            }
            Payload::Pair(pair) => match pair.iter_mut().find(|slot| !slot.is_valid()) {
                Some(slot) => *slot = child,
                None => debug_assert!(false, "{tag:?} already has two children"),
            },
            Payload::List(list) => {
                list.try_reserve(1).map_err(|_| AllocError)?;
                list.push(child);
            }
        }
        Ok(())
    }

    /// Allocate a node and attach `children` to it in order.
    pub fn create_with(
        &mut self,
        tag: NodeTag,
        token: Option<Token>,
        children: &[NodeId],
    ) -> Result<NodeId, AllocError> {
        let id = self.create(tag, token)?;
        for &child in children {
            self.attach(id, child)?;
        }
        Ok(id)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn tag(&self, id: NodeId) -> NodeTag {
        self.get(id).tag
    }

    /// Ordered children of `id`.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).children()
    }

    /// Source text of the node's token, or nothing if it has none.
    pub fn token_text<'s>(&self, id: NodeId, source: &'s SourceBuffer) -> &'s [u8] {
        match self.get(id).token {
            Some(token) => source.text(token),
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node, keeping the allocation for the next parse.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}
