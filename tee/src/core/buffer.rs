//! Append-only byte buffer with line-boundary cursors.
//!
//! Logically the buffer is one growing log of everything read from the input.
//! Physically it is a sliding window: once the consumed prefix grows past the
//! compaction threshold it is dropped, and all indices shift left together.
//! Chunk boundaries are computed relative to the window and are unaffected by
//! compaction.

use tracing::trace;

/// Consumed bytes kept around before the window slides forward.
pub const DEFAULT_COMPACT_THRESHOLD: usize = 64 * 1024;

const NEWLINE: u8 = b'\n';

/// Inclusive index range `[start, end]` of one chunk inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkBounds {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct LineBuffer {
    bytes: Vec<u8>,
    /// Index of the first unconsumed byte.
    start: usize,
    /// Bytes dropped from the front by compaction.
    discarded: u64,
    compact_threshold: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_COMPACT_THRESHOLD)
    }
}

impl LineBuffer {
    pub fn new(compact_threshold: usize) -> Self {
        Self {
            bytes: Vec::new(),
            start: 0,
            discarded: 0,
            compact_threshold: compact_threshold.max(1),
        }
    }

    /// Current window contents, consumed prefix included.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Growable tail for the reader to append into.
    pub fn tail_mut(&mut self) -> &mut Vec<u8> {
        &mut self.bytes
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Bytes currently held, consumed prefix included.
    pub fn window_len(&self) -> usize {
        self.bytes.len()
    }

    /// Bytes accumulated but not yet handed out as part of a chunk.
    pub fn pending(&self) -> &[u8] {
        &self.bytes[self.start..]
    }

    pub fn is_drained(&self) -> bool {
        self.start >= self.bytes.len()
    }

    /// Position of `start` in the whole input stream.
    pub fn stream_offset(&self) -> u64 {
        self.discarded + self.start as u64
    }

    /// Decide the next chunk after a read that appended `bytes_read` bytes.
    ///
    /// The chunk ends at the last newline in the pending range. With no
    /// newline pending, or at end of stream, everything pending is flushed as
    /// one chunk. Returns `None` when nothing is pending.
    pub fn chunk_bounds(&self, bytes_read: usize) -> Option<ChunkBounds> {
        if self.is_drained() {
            return None;
        }
        let last = self.bytes.len() - 1;
        if bytes_read == 0 {
            return Some(ChunkBounds {
                start: self.start,
                end: last,
            });
        }
        let end = self
            .pending()
            .iter()
            .rposition(|&b| b == NEWLINE)
            .map_or(last, |offset| self.start + offset);
        Some(ChunkBounds {
            start: self.start,
            end,
        })
    }

    /// Mark `bounds` as written. Advances `start` past the chunk and slides
    /// the window once enough bytes have been consumed.
    pub fn consume(&mut self, bounds: ChunkBounds) {
        debug_assert_eq!(bounds.start, self.start, "chunks must be consumed in order");
        debug_assert!(bounds.end < self.bytes.len(), "chunk end past buffer tail");
        self.start = bounds.end + 1;
        if self.start >= self.compact_threshold {
            self.compact();
        }
    }

    fn compact(&mut self) {
        let dropped = self.start;
        self.bytes.drain(..dropped);
        self.discarded += dropped as u64;
        self.start = 0;
        trace!(dropped, retained = self.bytes.len(), "compacted line buffer");
    }
}
