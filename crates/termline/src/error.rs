//! Errors surfaced by `read_line`.

use std::io;

use thiserror::Error;

/// Why a `read_line` call ended without an accepted line.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The byte source failed, or ran dry mid-read. A source that reaches
    /// end-of-stream surfaces as [`io::ErrorKind::UnexpectedEof`].
    #[error("read error: {0}")]
    Io(#[from] io::Error),

    /// Ctrl-D was pressed on an empty line.
    #[error("end of input")]
    Eof,
}

/// Result type for line reads.
pub type ReadResult<T> = Result<T, ReadError>;
