//! Line-oriented tee: copy standard input to standard output and a file.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (line buffer cursors, retry
//!   bookkeeping). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (retrying reads and writes, opening
//!   the destination, configuration). Generic over `Read`/`Write` so tests can
//!   inject faults.
//!
//! Orchestration modules ([`chunker`], [`tee_loop`]) coordinate the two to
//! implement the binary.

pub mod chunker;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod tee_loop;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
