//! Recoverable error types.
//!
//! Out-of-memory and precondition violations are never represented here —
//! they abort or are debug-asserted at the call site. This module only
//! covers the paths that are genuinely recoverable: file I/O and UTF-8
//! validation.

use thiserror::Error;

/// Errors returned by the recoverable (non-allocator) parts of this crate.
#[derive(Debug, Error)]
pub enum PolyError {
    /// An I/O error occurred while reading, writing, or appending a file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The file's size exceeds what this platform can address in memory.
    #[error("file size exceeds platform addressability")]
    FileTooLarge,

    /// A byte sequence was not valid UTF-8.
    #[error("invalid utf-8 at byte offset {offset}")]
    InvalidUtf8 {
        /// Offset of the first invalid byte.
        offset: usize,
    },
}
