//! Error types for the tee engine.
//!
//! Every variant is fatal to the call that produced it. Callers propagate
//! them unchanged; only the binary turns them into a diagnostic and exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`TeeError`].
pub type Result<T> = std::result::Result<T, TeeError>;

#[derive(Debug, Error)]
pub enum TeeError {
    /// Malformed call parameters (empty path, out-of-range write bounds).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] IoError),
}

/// I/O failures that survived the retry ceiling, or could not be retried.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot open {}", path.display())]
    CannotOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read failed {attempts} consecutive times")]
    ReadRetryExhausted {
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("write to {target} failed {attempts} consecutive times")]
    WriteRetryExhausted {
        target: String,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },
}

impl TeeError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_retry_exhausted(&self) -> bool {
        matches!(
            self,
            Self::Io(IoError::ReadRetryExhausted { .. } | IoError::WriteRetryExhausted { .. })
        )
    }
}
