//! The tee loop: every chunk goes to standard output, then to the file.

use std::io::{Read, Write};

use tracing::{debug, instrument, trace};

use crate::chunker::LineChunker;
use crate::error::Result;
use crate::io::config::TeeConfig;
use crate::io::reader::RetryingReader;
use crate::io::writer::RetryingWriter;

/// Name used for standard output in logs and errors.
pub const STDOUT_NAME: &str = "stdout";
/// Name used for the destination file in logs and errors.
pub const FILE_NAME: &str = "file";

/// Totals for one completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeeSummary {
    /// Chunks written to each destination.
    pub chunks: u64,
    /// Bytes written to each destination.
    pub bytes: u64,
}

/// Drive `chunker` to completion, writing each chunk to `stdout` and then
/// to `file`.
///
/// The chunk is consumed only after both writes succeed. Any error aborts the
/// run immediately; whatever was already written stays written.
#[instrument(skip_all, fields(stdout = stdout.destination(), file = file.destination()))]
pub fn run_tee<R: Read, O: Write, F: Write>(
    chunker: &mut LineChunker<R>,
    stdout: &mut RetryingWriter<O>,
    file: &mut RetryingWriter<F>,
) -> Result<TeeSummary> {
    let mut summary = TeeSummary::default();

    while let Some(bounds) = chunker.next_chunk()? {
        let buffer = chunker.buffer().as_slice();
        stdout.write_range(buffer, bounds.start, bounds.end)?;
        let written = file.write_range(buffer, bounds.start, bounds.end)?;
        chunker.advance(bounds);

        summary.chunks += 1;
        summary.bytes += written as u64;
        trace!(chunk = summary.chunks, bytes = written, "chunk written");
    }

    debug!(chunks = summary.chunks, bytes = summary.bytes, "tee finished");
    Ok(summary)
}

/// Copy `input` to `stdout` and `file` using the settings in `config`.
pub fn tee_stream<R: Read, O: Write, F: Write>(
    input: R,
    stdout: O,
    file: F,
    config: &TeeConfig,
) -> Result<TeeSummary> {
    let policy = config.retry_policy();
    let mut chunker = LineChunker::new(RetryingReader::new(input, policy), config.line_buffer());
    let mut stdout = RetryingWriter::new(stdout, STDOUT_NAME, policy);
    let mut file = RetryingWriter::new(file, FILE_NAME, policy);
    run_tee(&mut chunker, &mut stdout, &mut file)
}
