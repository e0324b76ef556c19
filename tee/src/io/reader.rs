//! Retrying, line-bounded reads from the input stream.

use std::io::Read;

use tracing::{error, trace, warn};

use crate::core::retry::{Attempt, RetryPolicy};
use crate::error::{IoError, Result};

const NEWLINE: u8 = b'\n';

/// Reads the input one byte at a time, retrying failed attempts.
///
/// Per-byte reads stop exactly at a newline, so no byte past a line boundary
/// is ever taken from the source. Wrap raw descriptors in a buffered reader
/// (a locked stdin already is one) to keep this cheap.
pub struct RetryingReader<R> {
    inner: R,
    policy: RetryPolicy,
    eof: bool,
}

impl<R: Read> RetryingReader<R> {
    pub fn new(inner: R, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            eof: false,
        }
    }

    /// Whether the source has reported end of stream. It is not read again
    /// afterwards.
    pub fn reached_eof(&self) -> bool {
        self.eof
    }

    /// Append bytes to `buffer` until a newline has been appended or the
    /// source reports end of stream.
    ///
    /// Returns the number of bytes appended by this call; `0` means end of
    /// stream. A failed attempt appends nothing and is retried until the
    /// policy's ceiling of consecutive failures is reached.
    pub fn read_line_into(&mut self, buffer: &mut Vec<u8>) -> Result<usize> {
        if self.eof {
            return Ok(0);
        }
        let mut counter = self.policy.counter();
        let mut appended = 0usize;
        let mut byte = [0u8; 1];

        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => {
                    self.eof = true;
                    trace!(appended, "read reached end of stream");
                    return Ok(appended);
                }
                Ok(_) => {
                    counter.record_success();
                    buffer.push(byte[0]);
                    appended += 1;
                    if byte[0] == NEWLINE {
                        trace!(appended, "read complete line");
                        return Ok(appended);
                    }
                }
                Err(err) => match counter.record_failure() {
                    Attempt::Retry(attempt) => {
                        warn!(attempt, limit = self.policy.limit, err = %err, "read failed, retrying");
                    }
                    Attempt::Exhausted(attempts) => {
                        error!(attempts, err = %err, "read retries exhausted");
                        return Err(IoError::ReadRetryExhausted {
                            attempts,
                            source: err,
                        }
                        .into());
                    }
                },
            }
        }
    }
}
