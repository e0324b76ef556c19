//! Test-only doubles for fault injection and output capture.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

/// Create a scratch directory and a path for a file inside it.
///
/// The directory is removed when the returned guard is dropped.
pub fn scratch_file(name: &str) -> io::Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(name);
    Ok((dir, path))
}

/// In-memory source that hands out one byte per read and fails on demand.
#[derive(Debug, Clone)]
pub struct FlakyReader {
    data: Vec<u8>,
    pos: usize,
    /// Remaining failures to inject before the byte at each offset.
    faults: HashMap<usize, u32>,
    strict_eof: bool,
    eof_reported: bool,
}

impl FlakyReader {
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
            faults: HashMap::new(),
            strict_eof: false,
            eof_reported: false,
        }
    }

    /// Fail every read attempted after end of stream has been reported.
    pub fn strict_eof(mut self) -> Self {
        self.strict_eof = true;
        self
    }

    /// Fail `times` read attempts before delivering the byte at `offset`.
    /// An offset equal to the input length fails before end of stream.
    pub fn fail_at(mut self, offset: usize, times: u32) -> Self {
        self.faults.insert(offset, times);
        self
    }
}

impl Read for FlakyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if let Some(remaining) = self.faults.get_mut(&self.pos)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(io::Error::other("injected read failure"));
        }
        if self.pos >= self.data.len() {
            if self.strict_eof && self.eof_reported {
                return Err(io::Error::other("read after end of stream"));
            }
            self.eof_reported = true;
            return Ok(0);
        }
        buf[0] = self.data[self.pos];
        self.pos += 1;
        Ok(1)
    }
}

/// In-memory sink that records accepted bytes and fails on demand.
#[derive(Debug, Clone, Default)]
pub struct FlakyWriter {
    written: Vec<u8>,
    /// Remaining failures to inject while `written.len()` equals the key.
    faults: HashMap<usize, u32>,
    max_write: Option<usize>,
    flush_failures: u32,
    accept_nothing: bool,
}

impl FlakyWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `times` write attempts once `offset` bytes have been accepted.
    pub fn fail_at(mut self, offset: usize, times: u32) -> Self {
        self.faults.insert(offset, times);
        self
    }

    /// Accept at most `limit` bytes per write call.
    pub fn max_write(mut self, limit: usize) -> Self {
        self.max_write = Some(limit);
        self
    }

    /// Fail the next `times` flush calls.
    pub fn fail_flush(mut self, times: u32) -> Self {
        self.flush_failures = times;
        self
    }

    /// Report zero bytes written on every call.
    pub fn accept_nothing(mut self) -> Self {
        self.accept_nothing = true;
        self
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }
}

impl Write for FlakyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.accept_nothing {
            return Ok(0);
        }
        if let Some(remaining) = self.faults.get_mut(&self.written.len())
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(io::Error::other("injected write failure"));
        }
        let accepted = buf.len().min(self.max_write.unwrap_or(usize::MAX));
        self.written.extend_from_slice(&buf[..accepted]);
        Ok(accepted)
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.flush_failures > 0 {
            self.flush_failures -= 1;
            return Err(io::Error::other("injected flush failure"));
        }
        Ok(())
    }
}

/// Shared log of writes across several sinks, in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<(String, Vec<u8>)>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose writes are recorded under `name`.
    pub fn sink(&self, name: &str) -> SharedSink {
        SharedSink {
            name: name.to_string(),
            journal: self.clone(),
        }
    }

    pub fn entries(&self) -> Vec<(String, Vec<u8>)> {
        self.0.borrow().clone()
    }

    /// Everything written to the sink called `name`, concatenated.
    pub fn bytes_for(&self, name: &str) -> Vec<u8> {
        self.0
            .borrow()
            .iter()
            .filter(|(entry, _)| entry == name)
            .flat_map(|(_, bytes)| bytes.iter().copied())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct SharedSink {
    name: String,
    journal: Journal,
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.journal
            .0
            .borrow_mut()
            .push((self.name.clone(), buf.to_vec()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Formatted log output captured from a scoped subscriber.
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with events at `warn` and above recorded into this capture.
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
