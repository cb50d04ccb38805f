use crate::error::{CursorError, Result};
use crate::list::cursor::ListCursor;
use crate::list::{List, Node, ReadGuard};
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// A fail-fast iterator over clones of the elements of a `List`.
///
/// It is a forward-only [`ListCursor`]. It yields `Ok(element)` until the end of
/// the list, and then `None`. If the list is structurally changed by anybody
/// else, it yields a single `Err(CursorError::ConcurrentModification { .. })`,
/// and then `None` forever.
///
/// # Examples
///
/// ```
/// use fail_fast_list::{CursorError, List};
///
/// let list = List::from_iter([1, 2, 3]);
/// let mut iter = list.iter();
/// assert_eq!(iter.next(), Some(Ok(1)));
///
/// // Modify the list behind the iterator's back.
/// list.cursor_end().add(4).unwrap();
///
/// assert!(matches!(
///     iter.next(),
///     Some(Err(CursorError::ConcurrentModification { .. }))
/// ));
/// assert_eq!(iter.next(), None);
/// ```
pub struct Iter<'a, T: 'a> {
    cursor: ListCursor<'a, T>,
    finished: bool,
}

impl<'a, T: 'a> Iter<'a, T> {
    pub(crate) fn new(cursor: ListCursor<'a, T>) -> Self {
        Self {
            cursor,
            finished: false,
        }
    }

    /// Convert back to the underlying cursor.
    pub fn into_cursor(self) -> ListCursor<'a, T> {
        self.cursor
    }
}

impl<'a, T: 'a> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("cursor", &self.cursor)
            .field("finished", &self.finished)
            .finish()
    }
}

impl<'a, T: Clone + 'a> Iterator for Iter<'a, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.cursor.next() {
            Ok(element) => Some(Ok(element)),
            Err(CursorError::EndOfSequence) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        match self.cursor.remaining() {
            Some(remaining) => (remaining, Some(remaining)),
            // one error is yielded
            None => (1, Some(1)),
        }
    }
}

impl<'a, T: Clone + 'a> FusedIterator for Iter<'a, T> {}

/// Continue traversing forward from the cursor position.
impl<'a, T: 'a> IntoIterator for ListCursor<'a, T>
where
    T: Clone,
{
    type Item = Result<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(self)
    }
}

impl<'a, T: Clone + 'a> IntoIterator for &'a List<T> {
    type Item = Result<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator over the elements of a `List`.
///
/// This `struct` is created by the [`into_iter`] method on [`List`]
/// (provided by the `IntoIterator` trait).
///
/// [`into_iter`]: List::into_iter
pub struct IntoIter<T> {
    list: List<T>,
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("list", &self.list)
            .finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.list.len();
        (len, Some(len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|item| self.push_back(item));
    }
}

impl<'a, T: 'a + Copy> Extend<&'a T> for List<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

/// An unchecked iterator over references to the elements, for use inside the
/// crate only. The list cannot be modified while it is alive.
pub(crate) struct Elements<'a, T: 'a> {
    current: NonNull<Node<T>>,
    ghost: NonNull<Node<T>>,
    _guard: ReadGuard<'a>,
    _marker: PhantomData<&'a T>,
}

impl<'a, T: 'a> Elements<'a, T> {
    pub(crate) fn new(list: &'a List<T>) -> Self {
        Self {
            current: list.front_node(),
            ghost: list.ghost_node(),
            _guard: list.read_guard(),
            _marker: PhantomData,
        }
    }
}

impl<'a, T: 'a> Iterator for Elements<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == self.ghost {
            return None;
        }
        // SAFETY: the list cannot be modified while the guard is held, so
        // `current` is a valid non-ghost node.
        let current = unsafe { self.current.as_ref() };
        self.current = current.next;
        Some(unsafe { current.element() })
    }
}
