//! Stable exit codes for the tee binary.

/// Input fully copied to both destinations.
pub const OK: i32 = 0;
/// Invalid arguments, unopenable destination, or exhausted I/O retries.
pub const FAILURE: i32 = 1;
