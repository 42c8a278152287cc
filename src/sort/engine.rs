use std::cmp::Ordering;

use tracing::trace;

use super::OrderingStrategy;

/// Slices up to this length are insertion sorted by [`Algorithm::Hybrid`].
const INSERTION_THRESHOLD: usize = 16;

/// Comparison sort used by a [`SortEngine`].
///
/// None of them is stable. Each one performs a number of comparisons bounded by the
/// slice length alone, whatever the strategy answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// At most `n * (n - 1) / 2` comparisons.
    Insertion,
    /// At most `2 * n * log2(n)` comparisons, roughly.
    Heap,
    /// Insertion sort for short slices, heap sort otherwise.
    #[default]
    Hybrid,
}

/// Sorts slices in place with a caller-supplied [`OrderingStrategy`].
///
/// The engine holds no state besides its algorithm choice and never mutates the strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortEngine {
    algorithm: Algorithm,
}

impl SortEngine {
    pub const fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Reorders `seq` so that no adjacent pair compares `Greater`.
    /// Slices of 0 or 1 elements are left untouched.
    pub fn sort<T, S>(&self, seq: &mut [T], strategy: &S)
    where
        S: OrderingStrategy<T> + ?Sized,
    {
        if seq.len() < 2 {
            return;
        }
        trace!(len = seq.len(), algorithm = ?self.algorithm, "sorting");
        match self.algorithm {
            Algorithm::Insertion => insertion_sort(seq, strategy),
            Algorithm::Heap => heap_sort(seq, strategy),
            Algorithm::Hybrid if seq.len() <= INSERTION_THRESHOLD => insertion_sort(seq, strategy),
            Algorithm::Hybrid => heap_sort(seq, strategy),
        }
    }
}

/// Sorts `seq` in place with the default engine.
pub fn sort<T, S>(seq: &mut [T], strategy: &S)
where
    S: OrderingStrategy<T> + ?Sized,
{
    SortEngine::default().sort(seq, strategy)
}

/// Checks that no adjacent pair of `seq` compares `Greater`.
pub fn is_sorted_by<T, S>(seq: &[T], strategy: &S) -> bool
where
    S: OrderingStrategy<T> + ?Sized,
{
    seq.windows(2)
        .all(|pair| strategy.compare(&pair[0], &pair[1]) != Ordering::Greater)
}

fn insertion_sort<T, S>(seq: &mut [T], strategy: &S)
where
    S: OrderingStrategy<T> + ?Sized,
{
    for i in 1..seq.len() {
        let mut j = i;
        while j > 0 && strategy.compare(&seq[j - 1], &seq[j]) == Ordering::Greater {
            seq.swap(j - 1, j);
            j -= 1;
        }
    }
}

fn heap_sort<T, S>(seq: &mut [T], strategy: &S)
where
    S: OrderingStrategy<T> + ?Sized,
{
    let len = seq.len();
    for start in (0..len / 2).rev() {
        sift_down(seq, start, len, strategy);
    }
    for end in (1..len).rev() {
        seq.swap(0, end);
        sift_down(seq, 0, end, strategy);
    }
}

/// Restores the max-heap property below `root` within `seq[..end]`.
/// `root` strictly grows, so the loop runs at most log2(end) times.
fn sift_down<T, S>(seq: &mut [T], mut root: usize, end: usize, strategy: &S)
where
    S: OrderingStrategy<T> + ?Sized,
{
    loop {
        let mut child = 2 * root + 1;
        if child >= end {
            break;
        }
        if child + 1 < end && strategy.compare(&seq[child], &seq[child + 1]) == Ordering::Less {
            child += 1;
        }
        if strategy.compare(&seq[root], &seq[child]) != Ordering::Less {
            break;
        }
        seq.swap(root, child);
        root = child;
    }
}
