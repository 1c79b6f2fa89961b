//! Text dump of a syntax tree.
//!
//! ```text
//! · block_and
//!   · name_def 'a'
//!     · value
//!       · number '1'
//!   · name_def 'b'
//! ```
//!
//! One line per node, two spaces per level, then `· <tag>` and, for nodes
//! that carry a token, the first ten bytes of its text in single quotes
//! (fewer if the tenth byte would split a UTF-8 character).
//! Golden tests compare this output verbatim.

use std::fmt::{self, Write};

use sprig_lexer_core::SourceBuffer;
use sprig_stack::ensure_sufficient_stack;

use crate::{NodeArena, NodeId};

/// Depth cap used when the caller has no preference.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Bytes of token text shown per node, at most.
const PREVIEW: usize = 10;

impl NodeArena {
    /// Write the subtree rooted at `root`.
    ///
    /// Nodes at depth `max_depth` and below are replaced by a single `…` line.
    pub fn dump<W: Write>(
        &self,
        out: &mut W,
        root: NodeId,
        source: &SourceBuffer,
        max_depth: usize,
    ) -> fmt::Result {
        self.dump_node(out, root, source, 0, max_depth)
    }

    pub fn dump_to_string(&self, root: NodeId, source: &SourceBuffer, max_depth: usize) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.dump(&mut out, root, source, max_depth);
        out
    }

    fn dump_node<W: Write>(
        &self,
        out: &mut W,
        id: NodeId,
        source: &SourceBuffer,
        depth: usize,
        max_depth: usize,
    ) -> fmt::Result {
        ensure_sufficient_stack(|| {
            indent(out, depth)?;
            if depth >= max_depth {
                return out.write_str("…\n");
            }

            let node = self.get(id);
            write!(out, "· {}", node.tag.name())?;
            if node.token.is_some() {
                let text = self.token_text(id, source);
                write!(out, " '{}'", String::from_utf8_lossy(preview(text)))?;
            }
            out.write_char('\n')?;

            for &child in node.children() {
                self.dump_node(out, child, source, depth + 1, max_depth)?;
            }
            Ok(())
        })
    }
}

/// The first `PREVIEW` bytes of `text`, shortened so no UTF-8 sequence is
/// cut in half.
fn preview(text: &[u8]) -> &[u8] {
    let mut cut = text.len().min(PREVIEW);
    while cut > 0 && cut < text.len() && text[cut] & 0xC0 == 0x80 {
        cut -= 1;
    }
    &text[..cut]
}

fn indent<W: Write>(out: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str("  ")?;
    }
    Ok(())
}
