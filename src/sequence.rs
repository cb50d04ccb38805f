//! The generic sequence capability satisfied by [`List`].
//!
//! Code that only needs to traverse and edit a sequence through fail-fast
//! list cursors can be written against [`SimpleList`] and [`ListIterator`]
//! instead of the concrete list type.
//!
//! # Examples
//!
//! ```
//! use fail_fast_list::sequence::{ListIterator, SimpleList};
//! use fail_fast_list::{List, Result};
//!
//! /// Double every element in place.
//! fn double_all<L>(list: &L) -> Result<()>
//! where
//!     L: SimpleList<i32>,
//! {
//!     let mut cursor = list.list_iter();
//!     while cursor.has_next()? {
//!         let value = cursor.next()?;
//!         cursor.set(value * 2)?;
//!     }
//!     Ok(())
//! }
//!
//! let list = List::from_iter([1, 2, 3]);
//! double_all(&list).unwrap();
//! assert_eq!(list.to_vec(), vec![2, 4, 6]);
//! ```

use crate::error::Result;
use crate::list::cursor::ListCursor;
use crate::list::iterator::Iter;
use crate::list::List;

/// A bidirectional, mutation-aware list cursor.
///
/// All methods fail with [`CursorError::ConcurrentModification`] once the
/// underlying sequence has been structurally changed by someone else.
///
/// [`CursorError::ConcurrentModification`]: crate::CursorError::ConcurrentModification
pub trait ListIterator<T> {
    fn has_next(&self) -> Result<bool>;
    fn has_previous(&self) -> Result<bool>;
    fn next(&mut self) -> Result<T>;
    fn previous(&mut self) -> Result<T>;
    fn next_index(&self) -> Result<usize>;
    /// `None` stands for the position before the first element.
    fn previous_index(&self) -> Result<Option<usize>>;
    fn add(&mut self, item: T) -> Result<()>;
    fn remove(&mut self) -> Result<T>;
    fn set(&mut self, item: T) -> Result<T>;
}

/// A sequence that hands out fail-fast iterators and list cursors.
pub trait SimpleList<T> {
    type Iter<'a>: Iterator<Item = Result<T>>
    where
        Self: 'a;
    type Cursor<'a>: ListIterator<T>
    where
        Self: 'a;

    /// A forward-only fail-fast iterator from the start.
    fn iter(&self) -> Self::Iter<'_>;

    /// A list cursor at the start.
    fn list_iter(&self) -> Self::Cursor<'_>;

    /// A list cursor before the element at `index`.
    fn list_iter_at(&self, index: usize) -> Result<Self::Cursor<'_>>;
}

impl<'a, T: Clone + 'a> ListIterator<T> for ListCursor<'a, T> {
    fn has_next(&self) -> Result<bool> {
        ListCursor::has_next(self)
    }

    fn has_previous(&self) -> Result<bool> {
        ListCursor::has_previous(self)
    }

    fn next(&mut self) -> Result<T> {
        ListCursor::next(self)
    }

    fn previous(&mut self) -> Result<T> {
        ListCursor::previous(self)
    }

    fn next_index(&self) -> Result<usize> {
        ListCursor::next_index(self)
    }

    fn previous_index(&self) -> Result<Option<usize>> {
        ListCursor::previous_index(self)
    }

    fn add(&mut self, item: T) -> Result<()> {
        ListCursor::add(self, item)
    }

    fn remove(&mut self) -> Result<T> {
        ListCursor::remove(self)
    }

    fn set(&mut self, item: T) -> Result<T> {
        ListCursor::set(self, item)
    }
}

impl<T: Clone> SimpleList<T> for List<T> {
    type Iter<'a> = Iter<'a, T> where Self: 'a;
    type Cursor<'a> = ListCursor<'a, T> where Self: 'a;

    fn iter(&self) -> Self::Iter<'_> {
        List::iter(self)
    }

    fn list_iter(&self) -> Self::Cursor<'_> {
        self.cursor_start()
    }

    fn list_iter_at(&self, index: usize) -> Result<Self::Cursor<'_>> {
        self.cursor(index)
    }
}
