//! Retrying writes of buffer ranges to one destination.

use std::io::{self, ErrorKind, Write};

use tracing::{error, trace, warn};

use crate::core::retry::{Attempt, RetryCounter, RetryPolicy};
use crate::error::{IoError, Result, TeeError};

/// Writes inclusive buffer ranges to a destination, retrying failed attempts.
///
/// The whole remaining range is offered on each attempt and the cursor
/// advances by however many bytes were accepted. A failed attempt leaves the
/// cursor where it is. Consecutive failures without progress count toward
/// the ceiling, so a transient error on one byte never counts against a later
/// one.
pub struct RetryingWriter<W> {
    inner: W,
    destination: String,
    policy: RetryPolicy,
}

impl<W: Write> RetryingWriter<W> {
    /// `destination` names the target in logs and errors.
    pub fn new(inner: W, destination: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            inner,
            destination: destination.into(),
            policy,
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Write `buffer[start..=end]` and flush.
    ///
    /// Returns the number of bytes written, always `end - start + 1`.
    pub fn write_range(&mut self, buffer: &[u8], start: usize, end: usize) -> Result<usize> {
        if end >= buffer.len() {
            return Err(TeeError::invalid_argument(format!(
                "write end {end} out of range for buffer of {} bytes",
                buffer.len()
            )));
        }
        if start > end {
            return Err(TeeError::invalid_argument(format!(
                "write start {start} is past end {end}"
            )));
        }

        let mut counter = self.policy.counter();
        let mut cursor = start;
        while cursor <= end {
            match self.inner.write(&buffer[cursor..=end]) {
                Ok(0) => self.record_failure(&mut counter, ErrorKind::WriteZero.into())?,
                Ok(written) => {
                    counter.record_success();
                    cursor += written;
                }
                Err(err) => self.record_failure(&mut counter, err)?,
            }
        }

        let mut counter = self.policy.counter();
        while let Err(err) = self.inner.flush() {
            self.record_failure(&mut counter, err)?;
        }

        let written = end - start + 1;
        trace!(destination = %self.destination, written, "wrote range");
        Ok(written)
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn record_failure(&self, counter: &mut RetryCounter, err: io::Error) -> Result<()> {
        match counter.record_failure() {
            Attempt::Retry(attempt) => {
                warn!(
                    destination = %self.destination,
                    attempt,
                    limit = self.policy.limit,
                    err = %err,
                    "write failed, retrying"
                );
                Ok(())
            }
            Attempt::Exhausted(attempts) => {
                error!(destination = %self.destination, attempts, err = %err, "write retries exhausted");
                Err(IoError::WriteRetryExhausted {
                    target: self.destination.clone(),
                    attempts,
                    source: err,
                }
                .into())
            }
        }
    }
}
