//! Sentinel-terminated source buffer for zero-bounds-check scanning.
//!
//! The buffer guarantees a `0x00` sentinel byte after the source content,
//! allowing the tokenizer to detect EOF without explicit bounds checking.
//! The total buffer size is rounded up to the next 64-byte boundary for
//! cache-line alignment, which also provides safe padding for `peek()`
//! near the end of the buffer.

use std::fmt;

use crate::{Cursor, Token};

/// Cache line size in bytes, used for buffer alignment padding.
const CACHE_LINE: usize = 64;

/// Sentinel-terminated source buffer.
///
/// # Layout
///
/// ```text
/// [source_bytes..., 0x00, padding_zeros...]
///  ^                ^     ^
///  0                |     rounded up to 64-byte boundary
///              source_len (sentinel)
/// ```
///
/// The buffer is the only long-lived shared resource of a parse: tokens and
/// nodes store offsets into it and re-slice on demand.
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    /// Owned buffer: `[source_bytes..., 0x00 sentinel, 0x00 padding...]`.
    buf: Vec<u8>,
    /// Length of the actual source content (excludes sentinel and padding).
    source_len: u32,
}

/// 1-based line and column of a byte offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl SourceBuffer {
    /// Create a buffer from UTF-8 source text.
    pub fn new(source: &str) -> Self {
        Self::from_bytes(source.as_bytes())
    }

    /// Create a buffer from raw bytes.
    ///
    /// The tokenizer is byte-oriented, so the input does not need to be
    /// valid UTF-8; this is what streaming callers use for partial chunks.
    ///
    /// Sources larger than `u32::MAX` bytes are truncated to `u32::MAX`:
    /// token offsets are 32-bit.
    pub fn from_bytes(source: &[u8]) -> Self {
        let source_len = source.len().min(u32::MAX as usize - CACHE_LINE);
        let source = &source[..source_len];

        // Round up to next 64-byte boundary (minimum: source + 1 sentinel byte).
        let padded_len = (source_len + 1 + CACHE_LINE - 1) & !(CACHE_LINE - 1);

        // The sentinel (buf[source_len]) and padding are already 0x00.
        let mut buf = vec![0u8; padded_len];
        buf[..source_len].copy_from_slice(source);

        Self {
            buf,
            source_len: u32::try_from(source_len).unwrap_or(u32::MAX),
        }
    }

    /// Returns the source bytes (without sentinel or padding).
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.source_len as usize]
    }

    /// Returns the full buffer including sentinel and padding.
    pub fn as_sentinel_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Create a [`Cursor`] positioned at byte 0.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len)
    }

    /// Length of the source content in bytes.
    pub fn len(&self) -> u32 {
        self.source_len
    }

    /// Returns `true` if the source content is empty.
    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }

    /// Source text of a token.
    pub fn text(&self, token: Token) -> &[u8] {
        let end = token.end.min(self.source_len) as usize;
        let start = (token.start as usize).min(end);
        &self.buf[start..end]
    }

    /// Line and column of `offset`, counted from scratch.
    ///
    /// The tokenizer tracks locations incrementally; this is for reporting
    /// after the fact, when only an offset (e.g. from a `ParseError`) is left.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "newline count and column are bounded by source_len, a u32"
    )]
    pub fn location(&self, offset: u32) -> Location {
        let offset = offset.min(self.source_len) as usize;
        let before = &self.buf[..offset];
        let line = memchr::memchr_iter(b'\n', before).count() as u32 + 1;
        let line_start = memchr::memrchr(b'\n', before).map_or(0, |nl| nl + 1);
        Location {
            line,
            column: (offset - line_start) as u32 + 1,
        }
    }
}

/// `SourceBuffer` is a `Vec` plus one offset.
const _: () = assert!(std::mem::size_of::<SourceBuffer>() <= 32);
