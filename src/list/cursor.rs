use crate::error::{CursorError, Result};
use crate::list::{List, Node};
use std::fmt;
use std::fmt::Formatter;
use std::ptr::NonNull;

/// A fail-fast list cursor over a `List`, with editing operations.
///
/// A `ListCursor` sits in a *gap* between two elements. In a list with length
/// *n*, there are *n* + 1 gaps, indexed by 0, 1, ..., *n*; the index of the
/// gap is the number of elements before it. The gap is bracketed by the nodes
/// `prev` and `next`, either of which may be the ghost node.
///
/// [`next`] and [`previous`] step over one element and remember it, so that a
/// following [`remove`] or [`set`] acts on it. The memory is cleared by
/// [`add`], [`remove`] and [`set`], so none of them can be repeated without
/// stepping again.
///
/// A cursor only borrows the list immutably, so several cursors can be used
/// over the same list in turn. Every cursor keeps a snapshot of the list's
/// version, and each of its methods first checks the snapshot against the
/// list: once the list has been structurally changed by somebody else, the
/// cursor fails with [`CursorError::ConcurrentModification`] forever.
///
/// # Examples
///
/// Here is a simple example showing how the cursor works. (The gap of the
/// cursor is denoted by `|`).
/// ```
/// use fail_fast_list::{CursorError, List};
///
/// let list = List::new();
/// let mut cursor = list.cursor_start();
///
/// // [|] -> [A B C|]
/// cursor.add('A').unwrap();
/// cursor.add('B').unwrap();
/// cursor.add('C').unwrap();
/// assert_eq!(cursor.next_index(), Ok(3));
///
/// // [A B|C]
/// assert_eq!(cursor.previous(), Ok('C'));
/// // [A|B C]
/// assert_eq!(cursor.previous(), Ok('B'));
/// // Replace the `B` just stepped over: [A|D C]
/// assert_eq!(cursor.set('D'), Ok('B'));
/// // Cannot replace it twice without stepping again.
/// assert_eq!(cursor.set('E'), Err(CursorError::InvalidCursorState));
///
/// // Remove the `D`: [A|C]
/// assert_eq!(cursor.next(), Ok('D'));
/// assert_eq!(cursor.remove(), Ok('D'));
/// assert_eq!(cursor.next_index(), Ok(1));
///
/// assert_eq!(list.to_vec(), vec!['A', 'C']);
/// ```
///
/// [`next`]: ListCursor::next
/// [`previous`]: ListCursor::previous
/// [`add`]: ListCursor::add
/// [`remove`]: ListCursor::remove
/// [`set`]: ListCursor::set
pub struct ListCursor<'a, T: 'a> {
    list: &'a List<T>,
    prev: NonNull<Node<T>>,
    next: NonNull<Node<T>>,
    /// the index of the gap
    pos: usize,
    /// the node that `remove` and `set` act on
    update: Option<NonNull<Node<T>>>,
    /// the version of the list this cursor is in sync with
    version: u64,
}

// Private methods
impl<'a, T: 'a> ListCursor<'a, T> {
    pub(crate) fn new(
        list: &'a List<T>,
        prev: NonNull<Node<T>>,
        next: NonNull<Node<T>>,
        pos: usize,
    ) -> Self {
        Self {
            list,
            prev,
            next,
            pos,
            update: None,
            version: list.version(),
        }
    }

    /// Fail if the list has been structurally modified since this cursor last
    /// synchronized with it.
    ///
    /// Every node pointer held by the cursor is only valid after this check
    /// passes.
    fn check_version(&self) -> Result<()> {
        let found = self.list.version();
        if self.version != found {
            tracing::debug!(
                expected = self.version,
                found,
                "rejected stale cursor"
            );
            return Err(CursorError::ConcurrentModification {
                expected: self.version,
                found,
            });
        }
        Ok(())
    }

    fn is_end(&self) -> bool {
        self.pos >= self.list.len()
    }

    fn is_start(&self) -> bool {
        self.pos == 0
    }

    pub(crate) fn remaining(&self) -> Option<usize> {
        self.check_version().ok()?;
        Some(self.list.len() - self.pos)
    }
}

impl<'a, T: 'a> ListCursor<'a, T> {
    /// Returns `true` if there is an element after the gap.
    pub fn has_next(&self) -> Result<bool> {
        self.check_version()?;
        Ok(!self.is_end())
    }

    /// Returns `true` if there is an element before the gap.
    pub fn has_previous(&self) -> Result<bool> {
        self.check_version()?;
        Ok(!self.is_start())
    }

    /// Returns the index of the element that [`next`](ListCursor::next) would
    /// return, i.e. the index of the gap. It is the length of the list at the end.
    pub fn next_index(&self) -> Result<usize> {
        self.check_version()?;
        Ok(self.pos)
    }

    /// Returns the index of the element that [`previous`](ListCursor::previous)
    /// would return, or `None` at the start of the list.
    pub fn previous_index(&self) -> Result<Option<usize>> {
        self.check_version()?;
        Ok(self.pos.checked_sub(1))
    }

    /// Steps forward over the next element and returns a clone of it.
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use fail_fast_list::{CursorError, List};
    ///
    /// let list = List::from_iter([1, 2]);
    /// let mut cursor = list.cursor_start();
    /// assert_eq!(cursor.next(), Ok(1));
    /// assert_eq!(cursor.next(), Ok(2));
    /// assert_eq!(cursor.next(), Err(CursorError::EndOfSequence));
    /// ```
    pub fn next(&mut self) -> Result<T>
    where
        T: Clone,
    {
        self.check_version()?;
        if self.is_end() {
            return Err(CursorError::EndOfSequence);
        }
        let node = self.next;
        // SAFETY: the version is in sync and the gap is not at the end, so
        // `next` is a valid non-ghost node.
        let (element, after) = unsafe {
            let _guard = self.list.read_guard();
            let node = node.as_ref();
            (node.element().clone(), node.next)
        };
        self.update = Some(node);
        self.prev = node;
        self.next = after;
        self.pos += 1;
        Ok(element)
    }

    /// Steps backward over the previous element and returns a clone of it.
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use fail_fast_list::{CursorError, List};
    ///
    /// let list = List::from_iter([1, 2]);
    /// let mut cursor = list.cursor_end();
    /// assert_eq!(cursor.previous(), Ok(2));
    /// assert_eq!(cursor.previous(), Ok(1));
    /// assert_eq!(cursor.previous(), Err(CursorError::EndOfSequence));
    /// ```
    pub fn previous(&mut self) -> Result<T>
    where
        T: Clone,
    {
        self.check_version()?;
        if self.is_start() {
            return Err(CursorError::EndOfSequence);
        }
        let node = self.prev;
        // SAFETY: the version is in sync and the gap is not at the start, so
        // `prev` is a valid non-ghost node.
        let (element, before) = unsafe {
            let _guard = self.list.read_guard();
            let node = node.as_ref();
            (node.element().clone(), node.prev)
        };
        self.update = Some(node);
        self.next = node;
        self.prev = before;
        self.pos -= 1;
        Ok(element)
    }

    /// Inserts an element into the gap. The new element ends up before the gap,
    /// so a following [`next`](ListCursor::next) is not affected, while a
    /// following [`previous`](ListCursor::previous) returns the new element.
    ///
    /// The insertion is a structural change: every other cursor over the list
    /// becomes invalid, while this one stays in sync.
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use fail_fast_list::{CursorError, List};
    ///
    /// let list = List::from_iter([1, 3]);
    /// let mut cursor = list.cursor(1).unwrap();
    /// cursor.add(2).unwrap();
    /// assert_eq!(cursor.next_index(), Ok(2));
    /// assert_eq!(cursor.next(), Ok(3));
    ///
    /// // The element just added cannot be removed directly.
    /// cursor.add(4).unwrap();
    /// assert_eq!(cursor.remove(), Err(CursorError::InvalidCursorState));
    ///
    /// assert_eq!(list.to_vec(), vec![1, 2, 3, 4]);
    /// ```
    pub fn add(&mut self, item: T) -> Result<()> {
        self.check_version()?;
        // SAFETY: the version is in sync, so `prev` is a valid node of the list.
        self.prev = unsafe { self.list.attach_after(self.prev, item) };
        self.update = None;
        self.pos += 1;
        self.version = self.list.version();
        Ok(())
    }

    /// Removes the element last returned by [`next`](ListCursor::next) or
    /// [`previous`](ListCursor::previous), and returns it.
    ///
    /// The removal is a structural change: every other cursor over the list
    /// becomes invalid, while this one stays in sync.
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use fail_fast_list::{CursorError, List};
    ///
    /// let list = List::from_iter(['A', 'B', 'C']);
    /// let mut cursor = list.cursor(1).unwrap();
    /// assert_eq!(cursor.remove(), Err(CursorError::InvalidCursorState));
    ///
    /// assert_eq!(cursor.previous(), Ok('A'));
    /// assert_eq!(cursor.remove(), Ok('A'));
    /// assert_eq!(cursor.next_index(), Ok(0));
    /// assert_eq!(list.to_vec(), vec!['B', 'C']);
    /// ```
    pub fn remove(&mut self) -> Result<T> {
        self.check_version()?;
        self.list.assert_not_reading();
        let node = self.update.take().ok_or(CursorError::InvalidCursorState)?;
        // SAFETY: the version is in sync, so `node` is still a non-ghost node of
        // the list, and one of the nodes bracketing the gap.
        unsafe {
            if node == self.next {
                self.next = node.as_ref().next;
            }
            if node == self.prev {
                self.prev = node.as_ref().prev;
                self.pos -= 1;
            }
            let node = self.list.detach_node(node);
            self.version = self.list.version();
            Ok(Node::into_element(node))
        }
    }

    /// Replaces the element last returned by [`next`](ListCursor::next) or
    /// [`previous`](ListCursor::previous), and returns the old one.
    ///
    /// Unlike [`add`](ListCursor::add) and [`remove`](ListCursor::remove), it
    /// does not change the structure of the list, so other cursors stay valid.
    /// Still, it cannot be repeated without stepping again.
    ///
    /// This operation should compute in *O*(1) time.
    pub fn set(&mut self, item: T) -> Result<T> {
        self.check_version()?;
        self.list.assert_not_reading();
        let mut node = self.update.take().ok_or(CursorError::InvalidCursorState)?;
        // SAFETY: the version is in sync, so `node` is still a non-ghost node of
        // the list.
        let element = unsafe { node.as_mut().element_mut() };
        Ok(std::mem::replace(element, item))
    }

    /// Temporarily view the list via an immutable reference.
    pub fn view(&self) -> &'a List<T> {
        self.list
    }
}

impl<'a, T: 'a> Clone for ListCursor<'a, T> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            prev: self.prev,
            next: self.next,
            pos: self.pos,
            update: self.update,
            version: self.version,
        }
    }
}

impl<'a, T: 'a> fmt::Debug for ListCursor<'a, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListCursor")
            .field("pos", &self.pos)
            .field("version", &self.version)
            .field("updatable", &self.update.is_some())
            .field("stale", &(self.version != self.list.version()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::CursorError;
    use crate::list::cursor::ListCursor;
    use crate::list::List;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    }

    fn is_concurrent_modification<T: std::fmt::Debug>(result: Result<T, CursorError>) -> bool {
        matches!(result, Err(CursorError::ConcurrentModification { .. }))
    }

    #[test]
    fn cursor_on_new_list() {
        let list = List::<i32>::new();
        let mut cursor = list.cursor(0).unwrap();
        assert_eq!(list.len(), 0);
        assert_eq!(cursor.has_next(), Ok(false));
        assert_eq!(cursor.has_previous(), Ok(false));
        assert_eq!(cursor.next_index(), Ok(0));
        assert_eq!(cursor.previous_index(), Ok(None));
        assert_eq!(cursor.next(), Err(CursorError::EndOfSequence));
        assert_eq!(cursor.previous(), Err(CursorError::EndOfSequence));
    }

    #[test]
    fn cursor_add_then_traverse() {
        let list = List::new();
        let mut cursor = list.cursor_start();
        for c in ['A', 'B', 'C'] {
            cursor.add(c).unwrap();
        }
        assert_eq!(list.len(), 3);

        let mut cursor = list.cursor_start();
        assert_eq!(cursor.next(), Ok('A'));
        assert_eq!(cursor.next(), Ok('B'));
        assert_eq!(cursor.next(), Ok('C'));
        assert_eq!(cursor.next_index(), Ok(3));
        assert_eq!(cursor.previous_index(), Ok(Some(2)));
        assert_eq!(cursor.has_next(), Ok(false));
    }

    #[test]
    fn cursor_forward_then_backward() {
        let values = Vec::from_iter(0..10);
        let list = List::new();
        let mut cursor = list.cursor_start();
        for &v in &values {
            cursor.add(v).unwrap();
        }

        let mut cursor = list.cursor_start();
        let forward: Vec<_> = (0..values.len()).map(|_| cursor.next().unwrap()).collect();
        assert_eq!(forward, values);
        let backward: Vec<_> = (0..values.len())
            .map(|_| cursor.previous().unwrap())
            .collect();
        assert_eq!(backward, Vec::from_iter(values.iter().rev().copied()));
        assert_eq!(cursor.has_previous(), Ok(false));
    }

    #[test]
    fn cursor_single_keeps_position_in_bounds() {
        init_tracing();
        let list = List::new();
        let mut cursor = list.cursor_start();
        // add, add, next, prev, prev, add, next, next, prev, ...
        let script = "aanppannppaaanpnpppnnnnn";
        for (i, step) in script.chars().enumerate() {
            let result = match step {
                'a' => cursor.add(i),
                'n' => cursor.next().map(drop),
                _ => cursor.previous().map(drop),
            };
            assert!(matches!(result, Ok(()) | Err(CursorError::EndOfSequence)));
            let pos = cursor.next_index().unwrap();
            assert!(pos <= list.len());
            assert_eq!(cursor.has_next(), Ok(pos < list.len()));
            assert_eq!(cursor.has_previous(), Ok(pos > 0));
        }
        assert_eq!(list.len(), 6);
    }

    #[test]
    fn cursor_insert_in_middle() {
        let list = List::from_iter([1, 4]);
        let mut cursor = list.cursor(1).unwrap();
        cursor.add(2).unwrap();
        cursor.add(3).unwrap();
        assert_eq!(cursor.next_index(), Ok(3));
        assert_eq!(cursor.previous(), Ok(3));
        assert_eq!(cursor.previous(), Ok(2));
        assert_eq!(list.to_vec(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn cursor_remove_after_next() {
        let list = List::from_iter(['A', 'B', 'C']);
        let mut cursor = list.cursor_start();
        assert_eq!(cursor.next(), Ok('A'));
        assert_eq!(cursor.next(), Ok('B'));
        assert_eq!(cursor.remove(), Ok('B'));
        assert_eq!(cursor.next_index(), Ok(1));
        assert_eq!(cursor.remove(), Err(CursorError::InvalidCursorState));
        assert_eq!(cursor.next(), Ok('C'));
        assert_eq!(cursor.has_next(), Ok(false));
        assert_eq!(cursor.previous(), Ok('C'));
        assert_eq!(cursor.previous(), Ok('A'));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn cursor_remove_after_previous() {
        let list = List::from_iter(['A', 'B', 'C']);
        let mut cursor = list.cursor(1).unwrap();
        assert_eq!(cursor.previous(), Ok('A'));
        assert_eq!(cursor.remove(), Ok('A'));
        assert_eq!(list.len(), 2);
        assert_eq!(cursor.next_index(), Ok(0));
        assert_eq!(cursor.has_previous(), Ok(false));

        let mut fresh = list.cursor_start();
        assert_eq!(fresh.next(), Ok('B'));
        assert_eq!(fresh.next(), Ok('C'));
        assert_eq!(fresh.has_next(), Ok(false));
    }

    #[test]
    fn cursor_remove_everything() {
        let values = Vec::from_iter((0..4).map(Rc::new));
        let list = List::from_iter(values.iter().cloned());
        let mut cursor = list.cursor_end();
        let mut removed = Vec::new();
        while cursor.has_previous().unwrap() {
            cursor.previous().unwrap();
            removed.push(*cursor.remove().unwrap());
        }
        assert_eq!(removed, vec![3, 2, 1, 0]);
        assert!(values.iter().all(|v| Rc::strong_count(v) == 1));
        assert!(list.is_empty());
        assert_eq!(cursor.next_index(), Ok(0));

        // The ring is intact after removing everything.
        cursor.add(Rc::clone(&values[0])).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(Rc::strong_count(&values[0]), 2);
        drop(list);
        assert_eq!(Rc::strong_count(&values[0]), 1);
    }

    #[test]
    #[should_panic(expected = "list modified while one of its elements is being read")]
    fn cursor_mutation_during_clone_panics() {
        // An element whose `Clone` inserts into the very list being read.
        struct Reentrant<'a> {
            cursor: &'a RefCell<Option<ListCursor<'a, Reentrant<'a>>>>,
        }
        impl<'a> Clone for Reentrant<'a> {
            fn clone(&self) -> Self {
                if let Some(cursor) = self.cursor.borrow_mut().as_mut() {
                    let _ = cursor.add(Reentrant {
                        cursor: self.cursor,
                    });
                }
                Reentrant {
                    cursor: self.cursor,
                }
            }
        }

        let slot: &'static RefCell<Option<ListCursor<'static, Reentrant<'static>>>> =
            Box::leak(Box::new(RefCell::new(None)));
        let list: &'static List<Reentrant<'static>> = Box::leak(Box::new(List::new()));
        list.cursor_start().add(Reentrant { cursor: slot }).unwrap();
        *slot.borrow_mut() = Some(list.cursor_start());
        let mut reader = list.cursor_start();
        let _ = reader.next();
    }

    #[test]
    fn cursor_set() {
        let list = List::from_iter([1, 2, 3]);
        let version = list.version();
        let mut cursor = list.cursor_start();
        assert_eq!(cursor.set(0), Err(CursorError::InvalidCursorState));
        assert_eq!(cursor.next(), Ok(1));
        assert_eq!(cursor.next(), Ok(2));
        assert_eq!(cursor.set(20), Ok(2));
        assert_eq!(cursor.set(200), Err(CursorError::InvalidCursorState));
        assert_eq!(cursor.remove(), Err(CursorError::InvalidCursorState));
        assert_eq!(cursor.previous(), Ok(20));
        assert_eq!(cursor.set(10), Ok(20));
        assert_eq!(list.to_vec(), vec![1, 10, 3]);
        // `set` is not a structural change
        assert_eq!(list.version(), version);
    }

    #[test]
    fn cursor_add_then_update_fails() {
        let list = List::from_iter([1]);
        let mut cursor = list.cursor_start();
        assert_eq!(cursor.next(), Ok(1));
        cursor.add(2).unwrap();
        assert_eq!(cursor.remove(), Err(CursorError::InvalidCursorState));
        assert_eq!(cursor.set(3), Err(CursorError::InvalidCursorState));
        assert_eq!(list.to_vec(), vec![1, 2]);
    }

    #[test]
    fn cursor_fail_fast_on_add() {
        init_tracing();
        let list = List::from_iter([1, 2, 3]);
        let mut a = list.cursor_start();
        let mut b = list.cursor(2).unwrap();
        assert_eq!(a.next(), Ok(1));

        b.add(10).unwrap();
        assert_eq!(b.next(), Ok(3));

        assert!(is_concurrent_modification(a.has_next()));
        assert!(is_concurrent_modification(a.has_previous()));
        assert!(is_concurrent_modification(a.next_index()));
        assert!(is_concurrent_modification(a.previous_index()));
        assert!(is_concurrent_modification(a.next()));
        assert!(is_concurrent_modification(a.previous()));
        assert!(is_concurrent_modification(a.add(0)));
        assert!(is_concurrent_modification(a.remove()));
        assert!(is_concurrent_modification(a.set(0)));
        // failed operations leave the list intact
        assert_eq!(list.to_vec(), vec![1, 2, 10, 3]);
    }

    #[test]
    fn cursor_fail_fast_on_remove() {
        let list = List::from_iter(['A', 'B', 'C']);
        let a = list.cursor_end();
        let mut b = list.cursor_start();
        assert_eq!(b.next(), Ok('A'));
        assert_eq!(b.remove(), Ok('A'));
        assert_eq!(
            a.has_next(),
            Err(CursorError::ConcurrentModification {
                expected: 3,
                found: 4,
            })
        );
        // `b` stays in sync with its own changes.
        assert_eq!(b.has_next(), Ok(true));
        assert_eq!(b.next(), Ok('B'));
    }

    #[test]
    fn cursor_stays_stale() {
        let list = List::new();
        let mut a = list.cursor_start();
        let mut b = list.cursor_start();
        b.add(1).unwrap();
        assert!(is_concurrent_modification(a.add(2)));
        // Even if `b` is gone, `a` never resynchronizes.
        drop(b);
        assert!(is_concurrent_modification(a.has_next()));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn cursor_set_keeps_other_cursors_valid() {
        let list = List::from_iter([1, 2]);
        let mut a = list.cursor_start();
        let mut b = list.cursor_start();
        assert_eq!(a.next(), Ok(1));
        assert_eq!(b.next(), Ok(1));
        assert_eq!(b.set(5), Ok(1));
        assert_eq!(a.previous(), Ok(5));
        assert_eq!(a.set(6), Ok(5));
        assert_eq!(list.to_vec(), vec![6, 2]);
    }

    #[test]
    fn cursor_clone_shares_snapshot() {
        let list = List::from_iter([1, 2, 3]);
        let mut a = list.cursor_start();
        assert_eq!(a.next(), Ok(1));
        let mut b = a.clone();
        assert_eq!(b.next_index(), Ok(1));
        assert_eq!(b.remove(), Ok(1));
        assert!(is_concurrent_modification(a.remove()));
        assert_eq!(list.to_vec(), vec![2, 3]);
    }

    #[test]
    fn cursor_debug() {
        let list = List::from_iter([1]);
        let mut a = list.cursor_start();
        let b = list.cursor_start();
        a.add(0).unwrap();
        assert_eq!(
            format!("{:?}", b),
            "ListCursor { pos: 0, version: 1, updatable: false, stale: true }"
        );
        assert_eq!(
            format!("{:?}", a),
            "ListCursor { pos: 1, version: 2, updatable: false, stale: false }"
        );
    }
}
