//! Line chunking on top of the retrying reader.

use std::io::Read;

use tracing::{debug, trace};

use crate::core::buffer::{ChunkBounds, LineBuffer};
use crate::error::Result;
use crate::io::reader::RetryingReader;

/// Turns the input stream into chunks that end at a newline or at end of
/// stream.
///
/// Each call to [`LineChunker::next_chunk`] reads at most one more line into
/// the buffer, then decides the chunk over everything still pending. Once the
/// reader has reported end of stream it is never read again.
pub struct LineChunker<R> {
    reader: RetryingReader<R>,
    buffer: LineBuffer,
}

impl<R: Read> LineChunker<R> {
    pub fn new(reader: RetryingReader<R>, buffer: LineBuffer) -> Self {
        Self { reader, buffer }
    }

    /// Read more input and return the bounds of the next chunk.
    ///
    /// Returns `None` once the input is exhausted and every byte has been
    /// consumed. The chunk stays pending until [`LineChunker::advance`].
    pub fn next_chunk(&mut self) -> Result<Option<ChunkBounds>> {
        let was_eof = self.reader.reached_eof();
        let bytes_read = self.reader.read_line_into(self.buffer.tail_mut())?;
        if !was_eof && self.reader.reached_eof() {
            debug!(
                offset = self.buffer.stream_offset(),
                pending = self.buffer.pending().len(),
                window = self.buffer.window_len(),
                "input reached end of stream"
            );
        }

        let bounds = self.buffer.chunk_bounds(bytes_read);
        trace!(bytes_read, ?bounds, "chunk boundary scan");
        Ok(bounds)
    }

    /// Bytes of a chunk returned by [`LineChunker::next_chunk`].
    pub fn chunk(&self, bounds: ChunkBounds) -> &[u8] {
        &self.buffer.as_slice()[bounds.start..=bounds.end]
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    /// Mark the chunk as written to every destination.
    pub fn advance(&mut self, bounds: ChunkBounds) {
        self.buffer.consume(bounds);
    }

    pub fn is_finished(&self) -> bool {
        self.reader.reached_eof() && self.buffer.is_drained()
    }
}
