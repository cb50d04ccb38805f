//! Errors raised by list cursors.
//!
//! Every error is raised synchronously and leaves the list structurally
//! intact. Once a cursor has observed [`CursorError::ConcurrentModification`]
//! it stays unusable; obtain a fresh one from the list.

/// The error type of all cursor operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    /// `next` or `previous` was called with no element in that direction.
    #[error("no more elements in this direction")]
    EndOfSequence,
    /// `remove` or `set` was called without a preceding `next` or `previous`,
    /// or right after an `add`, `remove` or `set`.
    #[error("no element was returned by `next` or `previous` since the last update")]
    InvalidCursorState,
    /// The list was structurally modified by someone else since this cursor
    /// took its snapshot.
    #[error("list was modified concurrently (cursor at version {expected}, list at version {found})")]
    ConcurrentModification { expected: u64, found: u64 },
    /// A cursor was requested at a position past the end of the list.
    #[error("cannot create cursor at index {index} in a list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, CursorError>;
