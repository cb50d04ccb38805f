use crate::list::List;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.elements().eq(other.elements())
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T: PartialOrd> PartialOrd for List<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.elements().partial_cmp(other.elements())
    }
}

impl<T: Ord> Ord for List<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.elements().cmp(other.elements())
    }
}

impl<T: Clone> Clone for List<T> {
    fn clone(&self) -> Self {
        self.elements().cloned().collect()
    }
}

impl<T: Hash> Hash for List<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for elt in self.elements() {
            elt.hash(state);
        }
    }
}

impl<T> List<T> {
    /// Returns `true` if the `List` contains an element equal to the given value.
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use fail_fast_list::List;
    ///
    /// let list = List::from_iter([0, 1, 2]);
    ///
    /// assert_eq!(list.contains(&0), true);
    /// assert_eq!(list.contains(&10), false);
    /// ```
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.elements().any(|e| e == x)
    }

    /// Copies the elements into a new `Vec`, from front to back.
    ///
    /// Unlike [`List::iter`], it never fails: the list is borrowed as a whole
    /// while it is being copied.
    ///
    /// # Examples
    ///
    /// ```
    /// use fail_fast_list::List;
    ///
    /// let list = List::from_iter(['a', 'b']);
    /// assert_eq!(list.to_vec(), vec!['a', 'b']);
    /// ```
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.elements().cloned().collect()
    }
}
