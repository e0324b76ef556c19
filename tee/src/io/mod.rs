//! I/O helpers for the tee engine.

pub mod config;
pub mod destination;
pub mod reader;
pub mod writer;
