//! This crate provides a doubly-linked list with owned nodes, implemented as a
//! cyclic list, and fail-fast list cursors to traverse and edit it.
//!
//! The [`List`] allows inserting and removing elements at a cursor in constant
//! time. In compromise, creating a cursor at a given position takes *O*(*n*)
//! time.
//!
//! Here is a quick example showing how the list works.
//!
//! ```
//! use fail_fast_list::{CursorError, List};
//!
//! let list = List::new();
//!
//! let mut cursor = list.cursor_start();
//! cursor.add('A').unwrap();
//! cursor.add('B').unwrap();
//! cursor.add('C').unwrap();
//! assert_eq!(list.len(), 3);
//!
//! // Step back over `C` and `B`, and remove `B`.
//! assert_eq!(cursor.previous(), Ok('C'));
//! assert_eq!(cursor.previous(), Ok('B'));
//! assert_eq!(cursor.remove(), Ok('B'));
//! assert_eq!(list.to_vec(), vec!['A', 'C']);
//!
//! // Nothing to remove until the cursor steps again.
//! assert_eq!(cursor.remove(), Err(CursorError::InvalidCursorState));
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the list is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                     (Ghost) Node N  │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢     Node 2, 3, ...     ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        ├───────────┤
//! │  ║ payload T ║           ║ payload T ║                        ┊No payload ┊
//! │  ╚═══════════╝           ╚═══════════╝                        └╌╌╌╌╌╌╌╌╌╌╌┘
//! │      Node 0                  Node 1                               ↑   ↑
//! └───────────────────────────────────────────────────────────────────┘   │
//! ╔═══════════╗                                                           │
//! ║   ghost   ║ ──────────────────────────────────────────────────────────┘
//! ╟───────────╢
//! ║    len    ║
//! ╟───────────╢
//! ║  version  ║
//! ╚═══════════╝
//!     List
//! ```
//! The `List` contains:
//! - a pointer `ghost` that points to the ghost node;
//! - a length field `len`;
//! - a version field `version` that counts the structural changes of the list.
//!
//! Initially, there is a ghost node in an empty list, of which the `next` and `prev`
//! pointer point to itself. The ghost node never holds a payload.
//!
//! # Cursors
//!
//! A [`ListCursor`] sits in a gap between two elements. In a list with length *n*,
//! there are *n* + 1 gaps, indexed by 0, 1, ..., *n*. The cursor can step over
//! the element after or before the gap with [`next`] and [`previous`], insert
//! into the gap with [`add`], and remove or replace the element it has just
//! stepped over with [`remove`] and [`set`].
//!
//! Cursors borrow the list immutably, so several of them can be held at once.
//! Each cursor remembers the [`version`] of the list it was created with (or
//! last changed itself). Once the list is structurally changed by anybody else,
//! every method of the cursor fails with [`CursorError::ConcurrentModification`].
//!
//! ```
//! use fail_fast_list::{CursorError, List};
//!
//! let list = List::from_iter([1, 2, 3]);
//! let mut a = list.cursor_start();
//! let mut b = list.cursor_end();
//!
//! assert_eq!(b.previous(), Ok(3));
//! assert_eq!(b.remove(), Ok(3));
//!
//! // `b` removed an element, so `a` is out of date...
//! assert!(matches!(
//!     a.has_next(),
//!     Err(CursorError::ConcurrentModification { .. })
//! ));
//! // ...while `b` is still usable.
//! assert_eq!(b.previous(), Ok(2));
//! ```
//!
//! The list is not thread-safe: it can be sent to another thread as a whole,
//! but it cannot be shared between threads.
//!
//! [`next`]: crate::ListCursor::next
//! [`previous`]: crate::ListCursor::previous
//! [`add`]: crate::ListCursor::add
//! [`remove`]: crate::ListCursor::remove
//! [`set`]: crate::ListCursor::set
//! [`version`]: crate::List::version

#[doc(inline)]
pub use error::{CursorError, Result};
#[doc(inline)]
pub use list::cursor::ListCursor;
#[doc(inline)]
pub use list::iterator::{IntoIter, Iter};
#[doc(inline)]
pub use list::List;

pub mod error;
pub mod list;
pub mod sequence;
