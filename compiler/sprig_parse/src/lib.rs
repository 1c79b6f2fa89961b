//! Parser for the sprig markup language.
//!
//! Turns a [`SourceBuffer`] into a tree of nodes in a caller-owned
//! [`NodeArena`]. Indentation is significant: lines at the same level form
//! a `block_and` (or `block_or` when a line starts with `|`), and a deeper
//! line opens the body of the construct above it.
//!
//! ```text
//! .a
//!   1
//!   .c = 2
//! .b
//! ```
//!
//! Parsing stops at the first error; see [`ParseError`].

mod error;
mod indent;
mod parser;

use sprig_ir::{NodeArena, NodeId};
use sprig_lexer_core::SourceBuffer;
use tracing::debug;

pub use error::ParseError;

/// Parse `source` into `arena`.
///
/// Returns `Ok(None)` for input that is empty or blank. On error the arena
/// may hold orphaned nodes from the partial parse.
pub fn parse(arena: &mut NodeArena, source: &SourceBuffer) -> Result<Option<NodeId>, ParseError> {
    debug!(bytes = source.len(), "parse start");
    let start_nodes = arena.len();
    let result = parser::Parser::new(arena, source).run();
    match &result {
        Ok(root) => debug!(
            nodes = arena.len() - start_nodes,
            empty = root.is_none(),
            "parse finished"
        ),
        Err(err) => debug!(kind = err.kind(), "parse failed"),
    }
    result
}

/// A source buffer together with the tree parsed from it.
#[derive(Debug)]
pub struct Parsed {
    pub source: SourceBuffer,
    pub arena: NodeArena,
    /// `None` for empty input.
    pub root: Option<NodeId>,
}

impl Parsed {
    /// Text dump of the tree; empty for empty input.
    pub fn dump(&self, max_depth: usize) -> String {
        match self.root {
            Some(root) => self.arena.dump_to_string(root, &self.source, max_depth),
            None => String::new(),
        }
    }
}

/// Convenience wrapper owning both the buffer and the arena.
pub fn parse_source(text: &str) -> Result<Parsed, ParseError> {
    let source = SourceBuffer::new(text);
    let mut arena = NodeArena::new();
    let root = parse(&mut arena, &source)?;
    Ok(Parsed {
        source,
        arena,
        root,
    })
}
