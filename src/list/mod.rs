use std::cell::Cell;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ptr::NonNull;

use crate::error::{CursorError, Result};
use crate::list::cursor::ListCursor;
use crate::list::iterator::Elements;
use crate::Iter;

pub mod cursor;
pub mod iterator;

mod algorithms;

/// The `List` is a doubly-linked list with owned nodes, implemented as a cyclic list
/// around a ghost node that never holds an element.
///
/// Reading and editing the list is done by [`ListCursor`]s, which only borrow the
/// list immutably. Any number of cursors may be held at the same time; a structural
/// change (insertion or removal) made through one cursor bumps the list's
/// [`version`], and every other outstanding cursor fails fast with
/// [`CursorError::ConcurrentModification`] on its next operation.
///
/// The `List` contains:
/// - a pointer `ghost` that points to the ghost node;
/// - a length field `len`;
/// - a version field `version`, incremented once per structural change.
///
/// # Examples
///
/// ```
/// use fail_fast_list::{CursorError, List};
///
/// let list = List::new();
/// let mut writer = list.cursor_start();
/// let mut reader = list.cursor_start();
///
/// writer.add('A').unwrap();
/// writer.add('B').unwrap();
/// assert_eq!(list.len(), 2);
///
/// // `reader` was created before the insertions.
/// assert!(matches!(
///     reader.has_next(),
///     Err(CursorError::ConcurrentModification { .. })
/// ));
/// ```
///
/// [`version`]: List::version
pub struct List<T> {
    ghost: NonNull<Node<T>>,
    len: Cell<usize>,
    version: Cell<u64>,
    /// the number of live references into elements handed out internally
    readers: Cell<usize>,
    _marker: PhantomData<Box<Node<T>>>,
    // Elements are written through shared references, so `List` must be
    // invariant in `T`.
    _invariant: PhantomData<Cell<T>>,
}

pub(crate) struct Node<T> {
    pub(crate) next: NonNull<Node<T>>,
    pub(crate) prev: NonNull<Node<T>>,
    /// Always initialized, except in the ghost node.
    element: MaybeUninit<T>,
}

// private methods
impl<T> List<T> {
    pub(crate) fn ghost_node(&self) -> NonNull<Node<T>> {
        self.ghost
    }
    pub(crate) fn front_node(&self) -> NonNull<Node<T>> {
        // SAFETY: `ghost.next` is always valid (either `ghost` itself, or the first element
        // in the list).
        unsafe { self.ghost.as_ref().next }
    }
    pub(crate) fn back_node(&self) -> NonNull<Node<T>> {
        // SAFETY: `ghost.prev` is always valid (either `ghost` itself, or the last element
        // in the list).
        unsafe { self.ghost.as_ref().prev }
    }

    /// Mark the elements as being read until the guard is dropped. Any
    /// mutation of the list during that time panics.
    pub(crate) fn read_guard(&self) -> ReadGuard<'_> {
        self.readers.set(self.readers.get() + 1);
        ReadGuard {
            readers: &self.readers,
        }
    }

    pub(crate) fn assert_not_reading(&self) {
        assert_eq!(
            self.readers.get(),
            0,
            "list modified while one of its elements is being read"
        );
    }

    fn bump_version(&self) -> u64 {
        let version = self.version.get().wrapping_add(1);
        self.version.set(version);
        version
    }

    /// Insert a new node holding `element` right after `prev`, and return it.
    ///
    /// It is unsafe because it does not check whether `prev` belongs to the list.
    pub(crate) unsafe fn attach_after(
        &self,
        prev: NonNull<Node<T>>,
        element: T,
    ) -> NonNull<Node<T>> {
        self.assert_not_reading();
        let node = Node::insert_after(prev, element);
        #[cfg(debug_assertions)]
        {
            assert_adjacent(prev, node);
            assert_adjacent(node, node.as_ref().next);
        }
        self.len.set(self.len.get() + 1);
        let version = self.bump_version();
        tracing::trace!(len = self.len.get(), version, "attached node");
        node
    }

    /// Detach a single node `node` from the list, and return it as a box.
    ///
    /// It is unsafe because it does not check whether `node` is a non-ghost
    /// node of the list. The caller must not keep `node` anywhere it could be
    /// read again without a version check first.
    pub(crate) unsafe fn detach_node(&self, node: NonNull<Node<T>>) -> Box<Node<T>> {
        debug_assert_ne!(node, self.ghost, "cannot detach the ghost node");
        self.assert_not_reading();
        Node::unlink(node);
        #[cfg(debug_assertions)]
        assert_adjacent(node.as_ref().prev, node.as_ref().next);
        self.len.set(self.len.get() - 1);
        let version = self.bump_version();
        tracing::trace!(len = self.len.get(), version, "detached node");
        Box::from_raw(node.as_ptr())
    }

    /// Iterate the elements by reference, without any version check.
    ///
    /// The yielded references must not be held across any cursor operation.
    pub(crate) fn elements(&self) -> Elements<'_, T> {
        Elements::new(self)
    }
}

impl<T> List<T> {
    /// Creates an empty `List`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fail_fast_list::List;
    ///
    /// let list: List<u32> = List::new();
    /// assert!(list.is_empty());
    /// assert_eq!(list.version(), 0);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            ghost: Node::new_ghost(),
            len: Cell::new(0),
            version: Cell::new(0),
            readers: Cell::new(0),
            _marker: PhantomData,
            _invariant: PhantomData,
        }
    }

    /// Returns `true` if the `List` is empty.
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front_node() == self.ghost_node()
    }

    /// Returns the length of the `List`.
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn len(&self) -> usize {
        self.len.get()
    }

    /// Returns the structural version of the `List`.
    ///
    /// The version is incremented exactly once by every insertion and every
    /// removal, whether it is made through a cursor or through the list itself.
    /// Replacing an element with [`ListCursor::set`] does not change it.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    /// Removes all elements from the `List`.
    ///
    /// This operation should compute in *O*(*n*) time.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// Adds an element first in the list.
    ///
    /// This operation should compute in *O*(1) time.
    pub fn push_front(&mut self, elt: T) {
        // SAFETY: the ghost node belongs to the list.
        unsafe { self.attach_after(self.ghost_node(), elt) };
    }

    /// Appends an element to the back of the list.
    ///
    /// This operation should compute in *O*(1) time.
    pub fn push_back(&mut self, elt: T) {
        // SAFETY: the back node (or the ghost node of an empty list) belongs to the list.
        unsafe { self.attach_after(self.back_node(), elt) };
    }

    /// Removes the first element and returns it, or `None` if the list is empty.
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use fail_fast_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.pop_front(), None);
    ///
    /// list.push_back(1);
    /// list.push_back(2);
    /// assert_eq!(list.pop_front(), Some(1));
    /// assert_eq!(list.pop_front(), Some(2));
    /// assert_eq!(list.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the front node is a non-ghost node.
        let node = unsafe { self.detach_node(self.front_node()) };
        // SAFETY: non-ghost nodes hold an initialized element.
        Some(unsafe { Node::into_element(node) })
    }

    /// Removes the last element and returns it, or `None` if the list is empty.
    ///
    /// This operation should compute in *O*(1) time.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the back node is a non-ghost node.
        let node = unsafe { self.detach_node(self.back_node()) };
        // SAFETY: non-ghost nodes hold an initialized element.
        Some(unsafe { Node::into_element(node) })
    }

    /// Creates a cursor whose gap sits before the element at index `at`, so that
    /// `next_index() == at`. Requires `at <= len`.
    ///
    /// The cursor is positioned by walking from the ghost node, in whichever
    /// direction is shorter, so this operation computes in
    /// *O*(min(`at`, `len` - `at`)) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use fail_fast_list::{CursorError, List};
    ///
    /// let list = List::from_iter(['A', 'B', 'C']);
    ///
    /// let mut cursor = list.cursor(1).unwrap();
    /// assert_eq!(cursor.next_index(), Ok(1));
    /// assert_eq!(cursor.next(), Ok('B'));
    ///
    /// assert_eq!(
    ///     list.cursor(4).err(),
    ///     Some(CursorError::IndexOutOfBounds { index: 4, len: 3 })
    /// );
    /// ```
    pub fn cursor(&self, at: usize) -> Result<ListCursor<'_, T>> {
        let len = self.len();
        if at > len {
            return Err(CursorError::IndexOutOfBounds { index: at, len });
        }
        // SAFETY: the ring has `len + 1` nodes, and we walk at most `len`
        // links away from the ghost node in either direction.
        let (prev, next) = unsafe {
            if at <= len - at {
                // [#-->p|n      ]
                let mut prev = self.ghost_node();
                for _ in 0..at {
                    prev = prev.as_ref().next;
                }
                (prev, prev.as_ref().next)
            } else {
                // [      p|n<--#]
                let mut next = self.ghost_node();
                for _ in at..len {
                    next = next.as_ref().prev;
                }
                (next.as_ref().prev, next)
            }
        };
        Ok(ListCursor::new(self, prev, next, at))
    }

    /// Creates a cursor at the start of the list (`next_index() == 0`).
    ///
    /// This operation should compute in *O*(1) time.
    pub fn cursor_start(&self) -> ListCursor<'_, T> {
        ListCursor::new(self, self.ghost_node(), self.front_node(), 0)
    }

    /// Creates a cursor at the end of the list (`next_index() == len`).
    ///
    /// This operation should compute in *O*(1) time.
    pub fn cursor_end(&self) -> ListCursor<'_, T> {
        ListCursor::new(self, self.back_node(), self.ghost_node(), self.len())
    }

    /// Creates a fail-fast forward iterator over clones of the elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use fail_fast_list::List;
    ///
    /// let list = List::from_iter([1, 2, 3]);
    /// let values: Result<Vec<_>, _> = list.iter().collect();
    /// assert_eq!(values, Ok(vec![1, 2, 3]));
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.cursor_start())
    }
}

impl<T: Debug> Debug for List<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.elements()).finish()
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct ReadGuard<'a> {
    readers: &'a Cell<usize>,
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.readers.set(self.readers.get() - 1);
    }
}

impl<T> Node<T> {
    fn new_ghost() -> NonNull<Node<T>> {
        let ghost = NonNull::from(Box::leak(Box::new(Node {
            next: NonNull::dangling(),
            prev: NonNull::dangling(),
            element: MaybeUninit::uninit(),
        })));
        // SAFETY: `ghost` has just been allocated, and its element is never read.
        unsafe {
            (*ghost.as_ptr()).next = ghost;
            (*ghost.as_ptr()).prev = ghost;
        }
        ghost
    }

    /// Allocate a new node holding `element` and splice it right after `this`.
    ///
    /// It is unsafe because `this` must be a node of a well-formed ring.
    pub(crate) unsafe fn insert_after(this: NonNull<Self>, element: T) -> NonNull<Self> {
        let next = this.as_ref().next;
        let node = NonNull::from(Box::leak(Box::new(Node {
            next,
            prev: this,
            element: MaybeUninit::new(element),
        })));
        connect(this, node);
        connect(node, next);
        node
    }

    /// Connect the neighbors of `this` to each other. The links of `this` are
    /// left untouched.
    ///
    /// It is unsafe because `this` must be a node of a well-formed ring.
    pub(crate) unsafe fn unlink(this: NonNull<Self>) {
        let (prev, next) = {
            let node = this.as_ref();
            (node.prev, node.next)
        };
        connect(prev, next);
    }

    /// It is unsafe because `self` must not be a ghost node.
    pub(crate) unsafe fn element(&self) -> &T {
        self.element.assume_init_ref()
    }

    /// It is unsafe because `self` must not be a ghost node.
    pub(crate) unsafe fn element_mut(&mut self) -> &mut T {
        self.element.assume_init_mut()
    }

    /// It is unsafe because `self` must not be a ghost node.
    pub(crate) unsafe fn into_element(self: Box<Self>) -> T {
        self.element.assume_init()
    }
}

unsafe fn connect<T>(mut prev: NonNull<Node<T>>, mut next: NonNull<Node<T>>) {
    prev.as_mut().next = next;
    next.as_mut().prev = prev;
}

#[cfg(debug_assertions)]
fn assert_adjacent<T>(prev: NonNull<Node<T>>, next: NonNull<Node<T>>) {
    unsafe {
        assert_eq!(prev.as_ref().next, next);
        assert_eq!(next.as_ref().prev, prev);
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the ghost node was leaked from a box in `Node::new_ghost`, and
        // its uninitialized element is not dropped by `MaybeUninit`.
        unsafe { drop(Box::from_raw(self.ghost.as_ptr())) };
    }
}

unsafe impl<T: Send> Send for List<T> {}
