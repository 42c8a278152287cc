use std::iter::FusedIterator;
use std::slice;

use super::{OrderingStrategy, SortEngine};

/// Insertion-ordered collection that permits duplicates.
///
/// A bag is filled with [`add`](Bag::add), enumerated with [`elements`](Bag::elements) and
/// drained into a plain `Vec` for sorting. Enumeration borrows the bag, so it cannot be
/// mutated while an enumeration is alive.
///
/// ```
/// use vfs_sort_kit::{Ascending, Bag, sort};
///
/// let mut bag = Bag::new();
/// for n in [5, 3, 9, 1] {
///     bag.add(n);
/// }
/// assert_eq!(bag.elements().copied().collect::<Vec<_>>(), vec![5, 3, 9, 1]);
///
/// let mut numbers = bag.drain();
/// sort(&mut numbers, &Ascending);
/// assert_eq!(numbers, vec![1, 3, 5, 9]);
/// assert!(bag.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bag<T> {
    items: Vec<T>,
}

impl<T> Bag<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Appends `element` after everything added so far.
    pub fn add(&mut self, element: T) {
        self.items.push(element);
    }

    /// Enumerates the elements in insertion order.
    ///
    /// Cloning the returned iterator snapshots its position; calling `elements()` again
    /// restarts from the first element.
    pub fn elements(&self) -> Elements<'_, T> {
        Elements {
            inner: self.items.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Moves every element out in insertion order, leaving the bag empty and reusable.
    pub fn drain(&mut self) -> Vec<T> {
        std::mem::take(&mut self.items)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Consumes the bag and returns its elements sorted with the default engine.
    pub fn into_sorted<S>(self, strategy: &S) -> Vec<T>
    where
        S: OrderingStrategy<T> + ?Sized,
    {
        let mut items = self.items;
        SortEngine::default().sort(&mut items, strategy);
        items
    }
}

impl<T> Default for Bag<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for Bag<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for Bag<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> IntoIterator for Bag<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Bag<T> {
    type Item = &'a T;
    type IntoIter = Elements<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements()
    }
}

/// Enumeration returned by [`Bag::elements`].
#[derive(Debug, Clone)]
pub struct Elements<'a, T> {
    inner: slice::Iter<'a, T>,
}

impl<'a, T> Iterator for Elements<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Elements<'_, T> {}

impl<T> FusedIterator for Elements<'_, T> {}
