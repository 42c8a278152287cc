use std::cmp::Ordering;

/// Pluggable three-way comparison used by the [`SortEngine`](crate::SortEngine).
///
/// Implementations must describe a total order (transitive and antisymmetric) for the
/// sorted-output guarantee to hold. The engine never checks this; a broken strategy only
/// produces an unspecified permutation.
///
/// Any `Fn(&T, &T) -> Ordering` closure is a strategy:
///
/// ```
/// use vfs_sort_kit::sort;
///
/// let mut words = vec!["pear", "fig", "banana"];
/// sort(&mut words, &|a: &&str, b: &&str| a.len().cmp(&b.len()));
/// assert_eq!(words, vec!["fig", "pear", "banana"]);
/// ```
pub trait OrderingStrategy<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> OrderingStrategy<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Natural order of `T`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ascending;

impl<T: Ord + ?Sized> OrderingStrategy<T> for Ascending {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Reverse of the natural order of `T`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Descending;

impl<T: Ord + ?Sized> OrderingStrategy<T> for Descending {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        b.cmp(a)
    }
}

/// Flips the result of the wrapped strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reversed<S>(pub S);

impl<T: ?Sized, S: OrderingStrategy<T>> OrderingStrategy<T> for Reversed<S> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(a, b).reverse()
    }
}

/// Compares elements by a key extracted from each of them.
#[derive(Debug, Clone, Copy)]
pub struct ByKey<F>(pub F);

impl<T, K, F> OrderingStrategy<T> for ByKey<F>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a).cmp(&(self.0)(b))
    }
}
