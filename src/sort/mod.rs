//! Generic comparator-driven sorting: a [`Bag`] to collect elements, pluggable
//! [`OrderingStrategy`] values and the [`SortEngine`] that applies them.

mod bag;
mod engine;
mod ordering;

pub use bag::{Bag, Elements};
pub use engine::{Algorithm, SortEngine, is_sorted_by, sort};
pub use ordering::{Ascending, ByKey, Descending, OrderingStrategy, Reversed};
