//! Byte cursor over a sentinel-terminated buffer.
//!
//! The cursor advances through the buffer byte-by-byte. EOF is detected
//! when the current byte equals the sentinel (`0x00`) and the position
//! has reached the source length. No explicit bounds checking is needed in
//! the common case -- the sentinel guarantees safe termination.
//!
//! # Interior Null Bytes
//!
//! A null at `pos < source_len` is an interior null (the tokenizer turns it
//! into an `Invalid` token); a null at `pos >= source_len` is the sentinel.

/// Byte cursor over a sentinel-terminated buffer.
///
/// Created via [`SourceBuffer::cursor()`](crate::SourceBuffer::cursor).
/// The cursor is [`Copy`], so a tokenizer can snapshot it for `peek()`.
///
/// # Invariant
///
/// `buf[source_len] == 0x00` and every byte after it is `0x00` padding.
/// This is guaranteed by [`SourceBuffer`](crate::SourceBuffer) construction.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    /// Sentinel-terminated buffer (source + sentinel + padding).
    buf: &'a [u8],
    /// Current read position (byte index into `buf`).
    pos: u32,
    /// Length of actual source content (excludes sentinel and padding).
    source_len: u32,
}

/// Cursor should stay a fat pointer plus two offsets.
const _: () = assert!(std::mem::size_of::<Cursor<'static>>() <= 24);

impl<'a> Cursor<'a> {
    /// Create a new cursor at position 0 over a sentinel-terminated buffer.
    pub(crate) fn new(buf: &'a [u8], source_len: u32) -> Self {
        debug_assert!(
            (source_len as usize) < buf.len(),
            "sentinel must be within buffer bounds"
        );
        debug_assert!(buf[source_len as usize] == 0, "sentinel byte must be 0x00");
        Self {
            buf,
            pos: 0,
            source_len,
        }
    }

    /// Returns the byte at the current position.
    ///
    /// Returns `0x00` at EOF. Interior null bytes also return `0x00`;
    /// use [`is_eof()`](Self::is_eof) to tell them apart.
    #[inline]
    pub fn current(&self) -> u8 {
        self.buf[self.pos as usize]
    }

    /// Returns the byte one position ahead of current.
    ///
    /// Safe at any position up to the sentinel: padding guarantees the read.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.buf[self.pos as usize + 1]
    }

    /// Advance the cursor by one byte.
    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    /// Returns `true` if the cursor sits on the sentinel.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.current() == 0 && self.pos >= self.source_len
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Length of the source content (excludes sentinel and padding).
    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// Source bytes in `start..end`.
    ///
    /// `end` must not exceed the source length.
    pub fn slice(&self, start: u32, end: u32) -> &'a [u8] {
        debug_assert!(
            end <= self.source_len,
            "slice end {end} exceeds source length {}",
            self.source_len
        );
        debug_assert!(start <= end, "slice start {start} exceeds end {end}");
        &self.buf[start as usize..end as usize]
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// `pred(0)` must return `false` so the sentinel stops the loop.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while pred(self.buf[self.pos as usize]) {
            self.pos += 1;
        }
    }
}
